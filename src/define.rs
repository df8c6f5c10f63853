//! Preprocessor definitions and the build-environment seam.

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Revision identifier key.
pub const GIT_HASH: &str = "GIT_HASH";
/// Build timestamp key.
pub const BUILD_TIMESTAMP: &str = "BUILD_TIMESTAMP";
/// Build host key (extended variant).
pub const BUILD_HOST: &str = "BUILD_HOST";
/// Build user key (extended variant).
pub const BUILD_USER: &str = "BUILD_USER";

/// One `NAME=value` preprocessor definition.
///
/// `raw` is the resolved string; [`Define::value`] is the form substituted
/// into source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Define {
    pub name: String,
    pub raw: String,
}

impl Define {
    pub fn new(name: impl Into<String>, raw: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            raw: raw.into(),
        }
    }

    /// The value as a C string literal, e.g. `"a1b2c3d"`.
    ///
    /// ```
    /// use buildstamp::define::Define;
    ///
    /// let define = Define::new("GIT_HASH", "a1b2c3d-dirty");
    /// assert_eq!(define.value(), "\"a1b2c3d-dirty\"");
    /// ```
    pub fn value(&self) -> String {
        quote_literal(&self.raw)
    }

    /// The definition as a single shell word, e.g. `'-DBUILD_TIMESTAMP="2024-05-01 12:34:56"'`.
    ///
    /// Build tools split flag lines shell-style before handing them to the
    /// compiler. Single quotes keep the spaces and the literal's backslashes
    /// intact through that split.
    pub fn shell_flag(&self) -> String {
        shell_quote(&format!("-D{}={}", self.name, self.value()))
    }
}

/// Quote `word` so a POSIX shell split yields it unchanged as one word.
pub fn shell_quote(word: &str) -> String {
    format!("'{}'", word.replace('\'', r"'\''"))
}

/// Wrap `raw` in double quotes, escaping `\` and `"` inside it.
pub fn quote_literal(raw: &str) -> String {
    let mut literal = String::with_capacity(raw.len() + 2);
    literal.push('"');
    for c in raw.chars() {
        match c {
            '\\' => literal.push_str("\\\\"),
            '"' => literal.push_str("\\\""),
            '\n' => literal.push_str("\\n"),
            _ => literal.push(c),
        }
    }
    literal.push('"');
    literal
}

/// A build-environment object owned by the surrounding build tool.
///
/// The injector only ever appends to it.
pub trait BuildEnvironment {
    fn append_defines(&mut self, defines: &[Define]);
}

/// Definitions collected in memory, in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DefineList {
    defines: Vec<Define>,
}

impl DefineList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn defines(&self) -> &[Define] {
        &self.defines
    }

    /// Look up a definition by name.
    pub fn get(&self, name: &str) -> Option<&Define> {
        self.defines.iter().find(|d| d.name == name)
    }

    /// Names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.defines.iter().map(|d| d.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.defines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defines.is_empty()
    }
}

/// Serializes as a map of name to raw value, in registration order.
impl Serialize for DefineList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.defines.len()))?;
        for d in &self.defines {
            map.serialize_entry(&d.name, &d.raw)?;
        }
        map.end()
    }
}

impl BuildEnvironment for DefineList {
    fn append_defines(&mut self, defines: &[Define]) {
        self.defines.extend_from_slice(defines);
    }
}

impl BuildEnvironment for Vec<(String, String)> {
    fn append_defines(&mut self, defines: &[Define]) {
        self.extend(defines.iter().map(|d| (d.name.clone(), d.value())));
    }
}

#[cfg(test)]
pub(crate) mod shell {
    /// Split a line into words the way a POSIX shell does, without expansion.
    pub fn split(line: &str) -> Vec<String> {
        let mut words = Vec::new();
        let mut word = String::new();
        let mut in_word = false;
        let mut chars = line.chars();
        while let Some(c) = chars.next() {
            match c {
                '\'' => {
                    in_word = true;
                    for q in chars.by_ref() {
                        if q == '\'' {
                            break;
                        }
                        word.push(q);
                    }
                }
                '"' => {
                    in_word = true;
                    while let Some(q) = chars.next() {
                        match q {
                            '"' => break,
                            '\\' => match chars.next() {
                                Some(e @ ('"' | '\\' | '$' | '`')) => word.push(e),
                                Some(e) => {
                                    word.push('\\');
                                    word.push(e);
                                }
                                None => word.push('\\'),
                            },
                            _ => word.push(q),
                        }
                    }
                }
                '\\' => {
                    in_word = true;
                    if let Some(e) = chars.next() {
                        word.push(e);
                    }
                }
                c if c.is_whitespace() => {
                    if in_word {
                        words.push(std::mem::take(&mut word));
                        in_word = false;
                    }
                }
                _ => {
                    in_word = true;
                    word.push(c);
                }
            }
        }
        if in_word {
            words.push(word);
        }
        words
    }

    /// Decode the body of a C string literal produced by `quote_literal`.
    pub fn unquote_literal(literal: &str) -> Option<String> {
        let inner = literal.strip_prefix('"')?.strip_suffix('"')?;
        let mut raw = String::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c == '\\' {
                match chars.next()? {
                    'n' => raw.push('\n'),
                    e => raw.push(e),
                }
            } else {
                raw.push(c);
            }
        }
        Some(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_quoted() {
        assert_eq!(Define::new(GIT_HASH, "nogit").value(), "\"nogit\"");
    }

    #[test]
    fn shell_flag_is_one_word_with_spaces() {
        let define = Define::new(BUILD_TIMESTAMP, "2024-05-01 12:34:56 UTC");
        let flag = define.shell_flag();
        assert_eq!(flag, r#"'-DBUILD_TIMESTAMP="2024-05-01 12:34:56 UTC"'"#);
        assert_eq!(
            shell::split(&flag),
            vec![r#"-DBUILD_TIMESTAMP="2024-05-01 12:34:56 UTC""#.to_string()]
        );
    }

    #[test]
    fn shell_flag_keeps_inner_escapes() {
        let define = Define::new(GIT_HASH, r#"a"b\c"#);
        let words = shell::split(&define.shell_flag());
        assert_eq!(words, vec![r#"-DGIT_HASH="a\"b\\c""#.to_string()]);
    }

    #[test]
    fn shell_quote_handles_single_quotes() {
        assert_eq!(shell::split(&shell_quote("it's")), vec!["it's".to_string()]);
    }

    #[test]
    fn define_list_serializes_in_order() {
        let mut list = DefineList::new();
        list.append_defines(&[
            Define::new(GIT_HASH, "v1.2.0"),
            Define::new(BUILD_HOST, "runner-42"),
        ]);
        let json = serde_json::to_string(&list).unwrap();
        assert_eq!(json, r#"{"GIT_HASH":"v1.2.0","BUILD_HOST":"runner-42"}"#);
    }

    #[test]
    fn quote_literal_escapes_inner_characters() {
        assert_eq!(quote_literal(r#"a"b\c"#), r#""a\"b\\c""#);
        assert_eq!(quote_literal("line\nbreak"), r#""line\nbreak""#);
        assert_eq!(quote_literal(""), "\"\"");
    }

    #[test]
    fn define_list_appends_in_order() {
        let mut list = DefineList::new();
        list.append_defines(&[Define::new(GIT_HASH, "v1.2.0")]);
        list.append_defines(&[Define::new(BUILD_TIMESTAMP, "2024-05-01 12:34:56")]);

        assert_eq!(list.names(), vec![GIT_HASH, BUILD_TIMESTAMP]);
        assert_eq!(list.get(GIT_HASH).map(Define::value).as_deref(), Some("\"v1.2.0\""));
        assert!(list.get(BUILD_HOST).is_none());
    }

    #[test]
    fn pair_vec_receives_quoted_values() {
        let mut pairs: Vec<(String, String)> = Vec::new();
        pairs.append_defines(&[Define::new(BUILD_USER, "ci")]);
        assert_eq!(pairs, vec![(BUILD_USER.to_string(), "\"ci\"".to_string())]);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Quoted values always start and end with a quote and contain no bare inner quote.
        #[test]
        fn prop_quote_literal_is_well_formed(raw in ".{0,40}") {
            let literal = quote_literal(&raw);
            prop_assert!(literal.starts_with('"'));
            prop_assert!(literal.ends_with('"'));
            prop_assert!(literal.len() >= 2);

            let inner = &literal[1..literal.len() - 1];
            let mut escaped = false;
            for c in inner.chars() {
                if escaped {
                    escaped = false;
                } else if c == '\\' {
                    escaped = true;
                } else {
                    prop_assert_ne!(c, '"');
                    prop_assert_ne!(c, '\n');
                }
            }
            prop_assert!(!escaped);
        }

        /// Any value survives a shell split as one flag whose literal decodes back to it.
        #[test]
        fn prop_shell_flag_survives_split(raw in "[a-z0-9 '\"\\\\:.-]{0,30}") {
            let define = Define::new(GIT_HASH, raw.as_str());
            let words = shell::split(&define.shell_flag());
            prop_assert_eq!(words.len(), 1);

            let literal = words[0]
                .strip_prefix("-DGIT_HASH=")
                .expect("flag prefix")
                .to_string();
            prop_assert_eq!(&literal, &define.value());
            prop_assert_eq!(shell::unquote_literal(&literal), Some(raw.clone()));
        }

        /// Plain identifiers pass through unchanged between the quotes.
        #[test]
        fn prop_plain_values_unchanged(raw in "[a-zA-Z0-9._-]{1,30}") {
            prop_assert_eq!(quote_literal(&raw), format!("\"{}\"", raw));
        }
    }
}
