/// An ordered collection of HTTP header fields.
///
/// Names are matched case-insensitively but keep the casing they were first
/// given with, so they serialize the way the caller wrote them. Inserting a
/// name that is already present replaces its value in place (last wins).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a header, replacing any existing value stored under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        match self.position(&name) {
            Some(idx) => self.entries[idx].1 = value,
            None => self.entries.push((name, value)),
        }
    }

    /// Sets a header only when no value exists for the name yet.
    pub fn insert_if_absent(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        if self.position(&name).is_none() {
            self.entries.push((name, value.into()));
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.position(name).map(|idx| self.entries[idx].1.as_str())
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.position(name).map(|idx| self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(k, _)| k.eq_ignore_ascii_case(name))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (k, v) in iter {
            headers.insert(k, v);
        }
        headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_ignores_case() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/html");

        assert_eq!(headers.get("content-type"), Some("text/html"));
        assert_eq!(headers.get("CONTENT-TYPE"), Some("text/html"));
    }

    #[test]
    fn duplicate_names_keep_last_value_and_first_position() {
        let mut headers = Headers::new();
        headers.insert("X-A", "1");
        headers.insert("X-B", "2");
        headers.insert("x-a", "3");

        let collected: Vec<_> = headers.iter().collect();
        assert_eq!(collected, vec![("X-A", "3"), ("X-B", "2")]);
    }

    #[test]
    fn insert_if_absent_does_not_override() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain");
        headers.insert_if_absent("content-type", "text/html");

        assert_eq!(headers.get("Content-Type"), Some("text/plain"));
        assert_eq!(headers.len(), 1);
    }
}
