use std::fmt;

/// A palette entry split into its parts. Palette entries look like
/// `minecraft:oak_stairs[facing=east,half=top]`; the namespace and the
/// property list are both optional.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlockState {
    namespace: String,
    name: String,
    properties: Vec<(String, String)>,
}

impl BlockState {
    /// Parse a palette entry. Returns `None` if the entry is not a valid
    /// namespaced name, optionally followed by `[key=value,...]`. A missing
    /// namespace means `minecraft`.
    pub fn parse(entry: &str) -> Option<BlockState> {
        let (id, props) = match entry.find('[') {
            Some(i) => {
                let props = entry[i + 1..].strip_suffix(']')?;
                (&entry[..i], Some(props))
            }
            None => (entry, None),
        };

        let (namespace, name) = match id.rsplit_once(':') {
            Some((ns, name)) if is_namespace(ns) => (ns, name),
            Some(_) => return None,
            None => ("minecraft", id),
        };
        if !is_path(name) {
            return None;
        }

        let mut properties = Vec::new();
        if let Some(props) = props.filter(|p| !p.is_empty()) {
            for prop in props.split(',') {
                let (k, v) = prop.split_once('=')?;
                if k.is_empty() || v.is_empty() {
                    return None;
                }
                properties.push((k.to_owned(), v.to_owned()));
            }
        }

        Some(BlockState {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            properties,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// The name without its namespace, eg `oak_stairs`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Properties in the order they were written.
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

impl fmt::Display for BlockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.name)?;
        if !self.properties.is_empty() {
            f.write_str("[")?;
            let mut sep = "";
            for (k, v) in &self.properties {
                write!(f, "{}{}={}", sep, k, v)?;
                sep = ",";
            }
            f.write_str("]")?;
        }
        Ok(())
    }
}

fn is_namespace(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'z' | b'_' | b'-' | b'.'))
}

fn is_path(s: &str) -> bool {
    !s.is_empty()
        && s.bytes()
            .all(|c| matches!(c, b'0'..=b'9' | b'a'..=b'z' | b'_' | b'-' | b'.' | b'/'))
}
