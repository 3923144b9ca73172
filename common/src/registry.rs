//! バーコード判定のメモ化
//!
//! 生値をキーにして判定結果を保持し、同じ値の再判定をスキップする。
//! 一度 approved/rejected になった値はセッション中変わらない。
//! エントリは削除しない。

use crate::types::{BarcodeRecord, BarcodeStatus};
use crate::validator::{Validator, Verdict};
use std::collections::HashMap;

#[derive(Debug, Clone, Default)]
pub struct BarcodeRegistry {
    entries: HashMap<String, BarcodeRecord>,
}

impl BarcodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 生値の判定結果を取得（未登録なら判定して登録）
    pub fn resolve<V: Validator + ?Sized>(&mut self, raw_value: &str, validator: &V) -> BarcodeRecord {
        if let Some(record) = self.entries.get(raw_value) {
            return record.clone();
        }

        // pending で登録してから即判定
        self.entries.insert(raw_value.to_string(), BarcodeRecord::pending());
        let verdict = validator.validate(raw_value);
        self.apply(raw_value, verdict);

        tracing::debug!(raw_value, status = %self.entries[raw_value].status, "barcode classified");
        self.entries[raw_value].clone()
    }

    /// 保留中の値を確定させる
    ///
    /// 確定済みの値は再判定しない。変更があった場合のみ true
    pub fn settle(&mut self, raw_value: &str, verdict: Verdict) -> bool {
        match self.entries.get(raw_value) {
            Some(record) if record.status == BarcodeStatus::Pending => {
                self.apply(raw_value, verdict)
            }
            _ => false,
        }
    }

    fn apply(&mut self, raw_value: &str, verdict: Verdict) -> bool {
        let record = match verdict {
            Verdict::Approved { serial_number } => BarcodeRecord::approved(serial_number),
            Verdict::Rejected => BarcodeRecord::rejected(),
            Verdict::Deferred => return false,
        };
        self.entries.insert(raw_value.to_string(), record);
        true
    }

    pub fn get(&self, raw_value: &str) -> Option<&BarcodeRecord> {
        self.entries.get(raw_value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &BarcodeRecord)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// 判定保留中の生値（ソート済み）
    pub fn pending_values(&self) -> Vec<&str> {
        let mut values: Vec<&str> = self
            .iter()
            .filter(|(_, r)| r.status == BarcodeStatus::Pending)
            .map(|(k, _)| k)
            .collect();
        values.sort_unstable();
        values
    }

    /// ステータスごとの件数 (pending, approved, rejected)
    pub fn counts(&self) -> (usize, usize, usize) {
        self.entries.values().fold((0, 0, 0), |(p, a, r), record| match record.status {
            BarcodeStatus::Pending => (p + 1, a, r),
            BarcodeStatus::Approved => (p, a + 1, r),
            BarcodeStatus::Rejected => (p, a, r + 1),
        })
    }
}
