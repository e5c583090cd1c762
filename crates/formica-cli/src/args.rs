// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Order-independent `key value` argument pairs. A trailing key with no
//! value reads as `1`, so bare boolean flags work. Values that fail to
//! parse fall back to the caller's default rather than aborting.

use std::collections::HashMap;

/// Parsed command line arguments.
#[derive(Debug, Clone, Default)]
pub struct ArgSet {
    values: HashMap<String, String>,
}

impl ArgSet {
    /// Parses the process arguments (without the program name).
    pub fn from_env() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    /// Parses an explicit argument sequence as `key value` pairs.
    pub fn parse<I>(args: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let mut values = HashMap::new();
        let mut args = args.into_iter();
        while let Some(key) = args.next() {
            let value = args.next().unwrap_or_else(|| "1".to_string());
            values.insert(key, value);
        }
        Self { values }
    }

    /// The raw value of `key`, if present.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Integer value of `key`, or `default` when absent or unparseable.
    pub fn get_i64(&self, key: &str, default: i64) -> i64 {
        self.get_str(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Unsigned value of `key`, or `default` when absent or unparseable.
    pub fn get_usize(&self, key: &str, default: usize) -> usize {
        self.get_str(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Float value of `key`, or `default` when absent or unparseable.
    pub fn get_f32(&self, key: &str, default: f32) -> f32 {
        self.get_str(key)
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Boolean value of `key`: `1`, `true`, or `yes` count as set.
    pub fn get_bool(&self, key: &str, default: bool) -> bool {
        match self.get_str(key) {
            Some(v) => matches!(v, "1" | "true" | "yes"),
            None => default,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ArgSet;

    fn args(list: &[&str]) -> ArgSet {
        ArgSet::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_pairs_are_order_independent() {
        let a = args(&["alg", "2", "ants", "6"]);
        let b = args(&["ants", "6", "alg", "2"]);
        assert_eq!(a.get_i64("alg", 0), b.get_i64("alg", 0));
        assert_eq!(a.get_usize("ants", 10), 6);
    }

    #[test]
    fn test_defaults_apply_when_missing_or_malformed() {
        let a = args(&["q0", "not-a-number"]);
        assert_eq!(a.get_f32("q0", 0.9), 0.9);
        assert_eq!(a.get_i64("timeout", -1), -1);
        assert!(!a.get_bool("verbose", false));
    }

    #[test]
    fn test_bool_forms() {
        let a = args(&["verbose", "1", "json", "true", "blank", "0"]);
        assert!(a.get_bool("verbose", false));
        assert!(a.get_bool("json", false));
        assert!(!a.get_bool("blank", false));
    }

    #[test]
    fn test_trailing_flag_reads_as_set() {
        let a = args(&["puzzle", "....", "verbose"]);
        assert!(a.get_bool("verbose", false));
        assert_eq!(a.get_str("puzzle"), Some("...."));
    }

    #[test]
    fn test_floats_parse() {
        let a = args(&["rho", "0.75", "evap", "0.01"]);
        assert_eq!(a.get_f32("rho", 0.9), 0.75);
        assert_eq!(a.get_f32("evap", 0.005), 0.01);
    }
}
