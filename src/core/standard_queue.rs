use crate::domain::model::Passenger;
use std::collections::VecDeque;

/// 一般艙旅客的先進先出佇列，順序即登記簿掃描順序
#[derive(Debug, Default)]
pub struct StandardQueue {
    items: VecDeque<Passenger>,
}

impl StandardQueue {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }

    pub fn enqueue(&mut self, passenger: Passenger) {
        self.items.push_back(passenger);
    }

    pub fn dequeue(&mut self) -> Option<Passenger> {
        self.items.pop_front()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
