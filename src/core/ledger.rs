use crate::domain::model::BoardingRecord;

/// 所有已登機紀錄，只能附加
#[derive(Debug, Default)]
pub struct BoardingLedger {
    records: Vec<BoardingRecord>,
}

impl BoardingLedger {
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub fn append(&mut self, record: BoardingRecord) {
        self.records.push(record);
    }

    /// 依附加順序回傳指定航班的紀錄；每次呼叫都反映目前內容
    pub fn query_by_flight<'a>(
        &'a self,
        flight_id: &'a str,
    ) -> impl Iterator<Item = &'a BoardingRecord> + 'a {
        self.records
            .iter()
            .filter(move |record| record.flight.id == flight_id)
    }

    pub fn records(&self) -> &[BoardingRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
