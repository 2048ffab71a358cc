use crate::diff::{self, DiffResult};

/// Replace every character of `text` with `symbol`, keeping its length.
pub fn mask_all(text: &str, symbol: char) -> String {
    text.chars().map(|_| symbol).collect()
}

/// Single practice text field: mask it, restore it, or check the current
/// value against the text it held when it was masked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PracticeField {
    value: String,
    original: Option<String>,
    mask_symbol: char,
}

impl PracticeField {
    pub fn new(mask_symbol: char) -> Self {
        Self {
            value: String::new(),
            original: None,
            mask_symbol,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut String {
        &mut self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn original(&self) -> Option<&str> {
        self.original.as_deref()
    }

    /// Save the current value and replace it with mask symbols.
    pub fn mask(&mut self) -> &str {
        let saved = std::mem::take(&mut self.value);
        self.value = mask_all(&saved, self.mask_symbol);
        self.original = Some(saved);
        &self.value
    }

    /// Restore the saved original. Returns `false` if nothing was masked yet.
    pub fn unmask(&mut self) -> bool {
        match &self.original {
            Some(original) => {
                self.value = original.clone();
                true
            }
            None => false,
        }
    }

    /// Compare the current value, taken as the attempt, with the saved
    /// original. The field is reset to the original afterwards.
    pub fn compare(&mut self) -> Option<DiffResult> {
        let original = self.original.as_ref()?;
        let attempt = std::mem::replace(&mut self.value, original.clone());
        Some(diff::compare(original, &attempt))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mask_all_keeps_length() {
        let masked = mask_all("fn main() {}\n", '*');
        assert_eq!(masked.chars().count(), 13);
        assert!(masked.chars().all(|c| c == '*'));
        assert_eq!(mask_all("", '*'), "");
    }

    #[test]
    fn mask_then_unmask_restores_text() {
        let mut field = PracticeField::new('#');
        field.set_value("let x = 1;");
        assert_eq!(field.mask(), "##########");
        assert!(field.unmask());
        assert_eq!(field.value(), "let x = 1;");
    }

    #[test]
    fn unmask_without_mask_is_refused() {
        let mut field = PracticeField::new('*');
        field.set_value("abc");
        assert!(!field.unmask());
        assert_eq!(field.value(), "abc");
    }

    #[test]
    fn compare_uses_current_value_as_attempt() {
        let mut field = PracticeField::new('*');
        field.set_value("hello");
        field.mask();
        field.set_value("hallo");

        let result = field.compare().unwrap();
        assert_eq!(result.matched_flags(), vec![true, false, true, true, true]);
        assert_eq!(field.value(), "hello");
    }

    #[test]
    fn compare_before_mask_has_nothing_to_check() {
        let mut field = PracticeField::new('*');
        field.set_value("abc");
        assert!(field.compare().is_none());
    }
}
