//! バーコード値の判定
//!
//! 既定は固定シリアル番号との完全一致。
//! 非同期の照合（サーバー問い合わせなど）は `Verdict::Deferred` を返し、
//! 後から `BarcodeRegistry::settle` で確定させる。

/// 承認済みシリアル番号（既定値）
pub const APPROVED_SERIAL_NUMBER: &str = "T2132000111632";

/// 判定結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Approved { serial_number: String },
    Rejected,
    /// 判定保留（pending のまま描画される）
    Deferred,
}

pub trait Validator {
    fn validate(&self, raw_value: &str) -> Verdict;
}

/// 1つの承認済み値とだけ一致を見る判定器
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSerialValidator {
    approved: String,
}

impl FixedSerialValidator {
    pub fn new(approved: impl Into<String>) -> Self {
        Self { approved: approved.into() }
    }

    pub fn approved(&self) -> &str {
        &self.approved
    }
}

impl Default for FixedSerialValidator {
    fn default() -> Self {
        Self::new(APPROVED_SERIAL_NUMBER)
    }
}

impl Validator for FixedSerialValidator {
    fn validate(&self, raw_value: &str) -> Verdict {
        if raw_value == self.approved {
            Verdict::Approved { serial_number: raw_value.to_string() }
        } else {
            Verdict::Rejected
        }
    }
}

impl<V: Validator + ?Sized> Validator for &V {
    fn validate(&self, raw_value: &str) -> Verdict {
        (**self).validate(raw_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approved_constant_matches() {
        let validator = FixedSerialValidator::default();
        assert_eq!(
            validator.validate("T2132000111632"),
            Verdict::Approved { serial_number: "T2132000111632".into() }
        );
    }

    #[test]
    fn test_other_value_rejected() {
        let validator = FixedSerialValidator::default();
        assert_eq!(validator.validate("1234567890128"), Verdict::Rejected);
    }

    #[test]
    fn test_match_is_exact() {
        let validator = FixedSerialValidator::default();
        assert_eq!(validator.validate(" T2132000111632"), Verdict::Rejected);
        assert_eq!(validator.validate("t2132000111632"), Verdict::Rejected);
        assert_eq!(validator.validate(""), Verdict::Rejected);
    }

    #[test]
    fn test_custom_approved_value() {
        let validator = FixedSerialValidator::new("SN-0001");
        assert_eq!(validator.approved(), "SN-0001");
        assert!(matches!(validator.validate("SN-0001"), Verdict::Approved { .. }));
        assert_eq!(validator.validate(APPROVED_SERIAL_NUMBER), Verdict::Rejected);
    }
}
