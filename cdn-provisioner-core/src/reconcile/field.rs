//! Field-by-field copy from declared configuration into a remote payload

use crate::error::{CoreError, CoreResult};
use crate::traits::ResourceData;
use crate::types::AttrError;

/// Copies declared attributes onto payload fields.
///
/// A present attribute overwrites the target. An attribute that was cleared
/// (absent and changed) resets the target to its zero value. Absent,
/// unchanged attributes leave the target untouched. A type mismatch aborts
/// the whole reconciliation.
pub struct FieldWriter<'a, D: ResourceData + ?Sized> {
    d: &'a D,
    family: &'static str,
}

impl<'a, D: ResourceData + ?Sized> FieldWriter<'a, D> {
    pub fn new(d: &'a D, family: &'static str) -> Self {
        Self { d, family }
    }

    fn apply<T: Default>(
        &self,
        key: &str,
        read: Result<T, AttrError>,
        target: &mut T,
    ) -> CoreResult<()> {
        match read {
            Ok(value) => {
                *target = value;
                Ok(())
            }
            Err(AttrError::NotFound(_)) => {
                if self.d.has_change(key) {
                    log::debug!("[{}] {key} cleared, erasing remote value", self.family);
                    *target = T::default();
                }
                Ok(())
            }
            Err(e) => {
                log::error!("[{}] {key} could not be reconciled: {e}", self.family);
                Err(CoreError::Validation(format!(
                    "object could not be populated: {e}"
                )))
            }
        }
    }

    pub fn string(&self, key: &str, target: &mut String) -> CoreResult<()> {
        self.apply(key, self.d.get_string(key), target)
    }

    pub fn list(&self, key: &str, target: &mut Vec<String>) -> CoreResult<()> {
        self.apply(key, self.d.get_list(key), target)
    }

    pub fn bool(&self, key: &str, target: &mut bool) -> CoreResult<()> {
        self.apply(key, self.d.get_bool(key), target)
    }

    pub fn int(&self, key: &str, target: &mut i64) -> CoreResult<()> {
        self.apply(key, self.d.get_int(key), target)
    }

    pub fn int32(&self, key: &str, target: &mut i32) -> CoreResult<()> {
        let read = self.d.get_int(key).and_then(|v| {
            i32::try_from(v).map_err(|_| AttrError::OutOfRange {
                key: key.to_string(),
                value: v,
            })
        });
        self.apply(key, read, target)
    }

    pub fn float(&self, key: &str, target: &mut f64) -> CoreResult<()> {
        self.apply(key, self.d.get_float(key), target)
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn float32(&self, key: &str, target: &mut f32) -> CoreResult<()> {
        self.apply(key, self.d.get_float(key).map(|v| v as f32), target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{AttrValue, DesiredRecord};

    #[test]
    fn absent_unchanged_keeps_target() {
        let d = DesiredRecord::new();
        let w = FieldWriter::new(&d, "test");
        let mut comment = "remote".to_string();
        w.string("comment", &mut comment).unwrap();
        assert_eq!(comment, "remote");
    }

    #[test]
    fn cleared_and_changed_resets_every_kind() {
        let mut d = DesiredRecord::from_state(
            "x",
            [
                ("comment", AttrValue::from("old")),
                ("round_robin_prefix", AttrValue::from("rr")),
                ("max_ttl", AttrValue::from(3600)),
                ("load_feedback", AttrValue::from(true)),
            ],
        );
        d.clear("comment")
            .declare("round_robin_prefix", "")
            .clear("max_ttl")
            .clear("load_feedback");
        let w = FieldWriter::new(&d, "test");

        let mut comment = "old".to_string();
        w.string("comment", &mut comment).unwrap();
        assert_eq!(comment, "");

        let mut prefix = "rr".to_string();
        w.string("round_robin_prefix", &mut prefix).unwrap();
        assert_eq!(prefix, "");

        let mut max_ttl = 3600;
        w.int("max_ttl", &mut max_ttl).unwrap();
        assert_eq!(max_ttl, 0);

        let mut load_feedback = true;
        w.bool("load_feedback", &mut load_feedback).unwrap();
        assert!(!load_feedback);
    }

    #[test]
    fn cleared_without_prior_value_keeps_target() {
        let mut d = DesiredRecord::new();
        d.clear("round_robin_prefix");
        let w = FieldWriter::new(&d, "test");
        let mut prefix = "vendor-default".to_string();
        w.string("round_robin_prefix", &mut prefix).unwrap();
        assert_eq!(prefix, "vendor-default");
    }

    #[test]
    fn int32_overflow_is_fatal() {
        let mut d = DesiredRecord::new();
        d.declare("ping_interval", i64::from(i32::MAX) + 1);
        let w = FieldWriter::new(&d, "test");
        let mut target = 0;
        assert!(matches!(
            w.int32("ping_interval", &mut target),
            Err(CoreError::Validation(_))
        ));
    }
}
