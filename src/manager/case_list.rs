use serde::{Deserialize, Serialize};

/// Ordered, duplicate-free list of case numbers; newest first
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseList {
    cases: Vec<String>,
}

impl CaseList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from stored values, dropping blanks and repeats
    pub fn from_stored(values: Vec<String>) -> Self {
        let mut list = Self::new();
        for value in values {
            if !value.trim().is_empty() && !list.contains(&value) {
                list.cases.push(value);
            }
        }
        list
    }

    /// Exact, case-sensitive membership test
    pub fn contains(&self, case_number: &str) -> bool {
        self.cases.iter().any(|c| c == case_number)
    }

    /// Insert at the front; false when the value is already present
    pub fn prepend(&mut self, case_number: String) -> bool {
        if self.contains(&case_number) {
            return false;
        }
        self.cases.insert(0, case_number);
        true
    }

    /// Remove every entry equal to the value; returns how many were removed
    pub fn remove_all(&mut self, case_number: &str) -> usize {
        let before = self.cases.len();
        self.cases.retain(|c| c != case_number);
        before - self.cases.len()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.cases
    }

    pub fn to_vec(&self) -> Vec<String> {
        self.cases.clone()
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }
}
