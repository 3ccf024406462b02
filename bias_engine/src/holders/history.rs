use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use tokio::sync::Mutex;

use crate::errors::Result;
use crate::models::ClassificationRecord;
use crate::providers::ClassificationHistoryStore;

/// История классификаций в памяти процесса.
#[derive(Clone, Default)]
pub struct ClassificationHistoryHolder {
    records: Arc<Mutex<Vec<ClassificationRecord>>>,
}

impl ClassificationHistoryHolder {
    pub fn new() -> Self {
        ClassificationHistoryHolder {
            records: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn add(&self, record: ClassificationRecord) -> Result<()> {
        let mut records = self.records.lock().await;
        records.push(record);
        Ok(())
    }

    pub async fn clear(&self) -> Result<()> {
        let mut records = self.records.lock().await;
        records.clear();
        Ok(())
    }

    pub async fn get(&self) -> Result<Vec<ClassificationRecord>> {
        let records = self.records.lock().await;
        Ok(records.clone())
    }

    pub async fn len(&self) -> Result<usize> {
        let records = self.records.lock().await;
        Ok(records.len())
    }
}

#[async_trait]
impl ClassificationHistoryStore for ClassificationHistoryHolder {
    async fn query(&self, company: &str, start: NaiveDate, end: NaiveDate) -> Result<Vec<ClassificationRecord>> {
        let records = self.records.lock().await;
        let mut found: Vec<ClassificationRecord> = records
            .iter()
            .filter(|r| r.company == company && r.date >= start && r.date <= end)
            .cloned()
            .collect();
        // Стабильная сортировка: записи за один день остаются в порядке добавления
        found.sort_by_key(|r| r.date);
        Ok(found)
    }

    async fn append(&self, record: ClassificationRecord) -> Result<()> {
        self.add(record).await
    }
}
