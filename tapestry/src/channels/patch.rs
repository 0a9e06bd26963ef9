//! Three-state field patch for partial updates of replace-rule fields.

/// Update instruction for one clearable replace-rule field.
///
/// A partial update must be able to distinguish "leave the field alone" from
/// "clear the field": perception snapshots and consumed decisions are explicitly
/// cleared by the node that consumed them, while fields absent from an update
/// stay untouched.
///
/// Default is [`Patch::Keep`], so `Update::default()` is an identity.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Patch<T> {
    /// Field is absent from the update; current value is untouched.
    #[default]
    Keep,
    /// Reset the field to its empty value.
    Clear,
    /// Replace the field with a new value.
    Set(T),
}

impl<T> Patch<T> {
    /// Returns true when this patch writes the field (Clear or Set).
    pub fn writes(&self) -> bool {
        !matches!(self, Patch::Keep)
    }

    /// Applies this patch to an `Option<T>` field.
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            Patch::Keep => {}
            Patch::Clear => *field = None,
            Patch::Set(v) => *field = Some(v),
        }
    }
}

impl<T: Clone> Patch<T> {
    /// Applies this patch to a collection-valued field whose empty value is `T::default()`.
    pub fn apply_to_value(self, field: &mut T)
    where
        T: Default,
    {
        match self {
            Patch::Keep => {}
            Patch::Clear => *field = T::default(),
            Patch::Set(v) => *field = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: Keep leaves the field untouched; Clear empties it; Set replaces it.
    #[test]
    fn patch_applies_to_option_field() {
        let mut field = Some(1);
        Patch::Keep.apply_to(&mut field);
        assert_eq!(field, Some(1));

        Patch::Set(2).apply_to(&mut field);
        assert_eq!(field, Some(2));

        Patch::<i32>::Clear.apply_to(&mut field);
        assert_eq!(field, None);
    }

    /// **Scenario**: Default patch is Keep, so a defaulted update is an identity.
    #[test]
    fn patch_default_is_keep() {
        let p: Patch<String> = Patch::default();
        assert_eq!(p, Patch::Keep);
        assert!(!p.writes());
    }

    /// **Scenario**: apply_to_value resets collections on Clear.
    #[test]
    fn patch_applies_to_collection() {
        let mut ids = vec!["a".to_string()];
        Patch::Set(vec!["b".to_string()]).apply_to_value(&mut ids);
        assert_eq!(ids, vec!["b".to_string()]);
        Patch::<Vec<String>>::Clear.apply_to_value(&mut ids);
        assert!(ids.is_empty());
    }
}
