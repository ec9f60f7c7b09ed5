use std::fmt;

/// A running container instance as reported by the runtime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Container {
    pub id: String,
    pub name: String,
    /// Compose service this container belongs to
    pub service: String,
}

impl Container {
    pub fn new(id: impl Into<String>, name: impl Into<String>, service: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            service: service.into(),
        }
    }
}

/// Ordered set of compose service names.
///
/// Insertion order is kept so that container lookups and error messages
/// follow the order in which the services were resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceNames(Vec<String>);

impl ServiceNames {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a name, ignoring duplicates. Returns `true` if it was inserted.
    pub fn push(&mut self, name: impl Into<String>) -> bool {
        let name = name.into();
        if self.0.contains(&name) {
            return false;
        }
        self.0.push(name);
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|n| n == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ServiceNames {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut names = Self::new();
        for name in iter {
            names.push(name);
        }
        names
    }
}

impl fmt::Display for ServiceNames {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_names_dedup_keeps_order() {
        let names: ServiceNames = ["web", "db", "web", "cache"].into_iter().collect();
        assert_eq!(names.len(), 3);
        assert_eq!(names.iter().collect::<Vec<_>>(), vec!["web", "db", "cache"]);
    }

    #[test]
    fn test_service_names_display() {
        let names: ServiceNames = ["web", "worker"].into_iter().collect();
        assert_eq!(names.to_string(), "[web worker]");
        assert_eq!(ServiceNames::new().to_string(), "[]");
    }

    #[test]
    fn test_contains() {
        let names: ServiceNames = ["web"].into_iter().collect();
        assert!(names.contains("web"));
        assert!(!names.contains("db"));
    }
}
