/// Three-state edit of an optional card field.
///
/// `NoChange` keeps the current value, `Set` replaces it and `Clear`
/// removes it. Plain `Option<T>` cannot tell "leave alone" from "clear".
///
/// ```
/// use taskboard_domain::FieldUpdate;
///
/// let mut description = Some("Create mockups".to_string());
/// FieldUpdate::<String>::NoChange.apply_to(&mut description);
/// assert_eq!(description.as_deref(), Some("Create mockups"));
///
/// FieldUpdate::<String>::Clear.apply_to(&mut description);
/// assert_eq!(description, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FieldUpdate<T> {
    #[default]
    NoChange,
    Set(T),
    Clear,
}

impl<T> FieldUpdate<T> {
    pub fn apply_to(self, field: &mut Option<T>) {
        match self {
            FieldUpdate::NoChange => {}
            FieldUpdate::Set(value) => *field = Some(value),
            FieldUpdate::Clear => *field = None,
        }
    }

    pub fn is_change(&self) -> bool {
        !matches!(self, FieldUpdate::NoChange)
    }
}

impl<T> From<Option<T>> for FieldUpdate<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldUpdate::Clear, FieldUpdate::Set)
    }
}
