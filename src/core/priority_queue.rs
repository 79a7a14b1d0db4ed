use crate::domain::model::Passenger;

/// 以優先級為鍵的二元最大堆，只存在於單次登機流程中
///
/// 上浮與下沉都使用嚴格的 `>` 比較，相同優先級的旅客之間不會互換位置，
/// 因此同級旅客的出堆順序由堆的結構決定，並不保證先進先出。
#[derive(Debug, Default)]
pub struct PriorityQueue {
    heap: Vec<Passenger>,
}

impl PriorityQueue {
    pub fn new() -> Self {
        Self { heap: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    #[cfg(test)]
    fn peek(&self) -> Option<&Passenger> {
        self.heap.first()
    }

    pub fn insert(&mut self, passenger: Passenger) {
        self.heap.push(passenger);
        self.sift_up(self.heap.len() - 1);
    }

    /// 取出堆頂；空堆回傳 `None`
    pub fn extract_max(&mut self) -> Option<Passenger> {
        let last = self.heap.pop()?;
        if self.heap.is_empty() {
            return Some(last);
        }

        let top = std::mem::replace(&mut self.heap[0], last);
        self.sift_down(0);
        Some(top)
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = (index - 1) / 2;
            if self.heap[index].priority > self.heap[parent].priority {
                self.heap.swap(index, parent);
                index = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let size = self.heap.len();
        loop {
            let left = 2 * index + 1;
            let right = 2 * index + 2;
            let mut largest = index;

            if left < size && self.heap[left].priority > self.heap[largest].priority {
                largest = left;
            }
            if right < size && self.heap[right].priority > self.heap[largest].priority {
                largest = right;
            }
            if largest == index {
                break;
            }

            self.heap.swap(index, largest);
            index = largest;
        }
    }
}
