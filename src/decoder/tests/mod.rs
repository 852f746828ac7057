//! Test utilities for building WOD ASCII cast records
//!
//! Records are assembled from the same field encodings the decoder reads,
//! so individual fields can be replaced to exercise edge cases.


/// Encode a length-prefixed field
pub fn prefixed(value: &str) -> String {
    assert!(value.len() <= 9, "length prefix is a single digit");
    format!("{}{}", value.len(), value)
}

/// Encode a numeric field; the total-digits count excludes any sign
pub fn numeric(significant: u8, precision: u8, digits: &str) -> String {
    let total = digits.trim_start_matches(['-', '+']).len();
    format!("{significant}{total}{precision}{digits}")
}

/// One declared variable with its metadata entries
#[derive(Debug, Clone)]
pub struct TestVariable {
    pub code: String,
    pub qc_flag: char,
    pub meta_count: String,
    pub entries: Vec<(String, String)>,
}

impl TestVariable {
    /// Variable whose metadata count matches its entries
    pub fn new(code: &str, entries: &[(&str, &str)]) -> Self {
        Self {
            code: prefixed(code),
            qc_flag: '0',
            meta_count: prefixed(&entries.len().to_string()),
            entries: entries
                .iter()
                .map(|(code, value)| (prefixed(code), value.to_string()))
                .collect(),
        }
    }

    fn encode(&self) -> String {
        let mut out = format!("{}{}{}", self.code, self.qc_flag, self.meta_count);
        for (code, value) in &self.entries {
            out.push_str(code);
            out.push_str(value);
        }
        out
    }
}

/// Builder for a complete cast record with realistic defaults
#[derive(Debug, Clone)]
pub struct CastBuilder {
    pub profile_bytes: String,
    pub cast_number: String,
    pub country: String,
    pub cruise: String,
    pub year: String,
    pub month: String,
    pub day: String,
    pub time: String,
    pub latitude: String,
    pub longitude: String,
    pub levels: String,
    pub profile_type: String,
    pub variable_count: Option<String>,
    pub variables: Vec<TestVariable>,
}

impl Default for CastBuilder {
    fn default() -> Self {
        Self {
            profile_bytes: prefixed("123"),
            cast_number: prefixed("67890"),
            country: "US".to_string(),
            cruise: prefixed("7"),
            year: "2023".to_string(),
            month: "06".to_string(),
            day: "15".to_string(),
            time: numeric(4, 2, "1230"),
            latitude: numeric(4, 2, "-5513"),
            longitude: numeric(5, 2, "12345"),
            levels: prefixed("25"),
            profile_type: "0".to_string(),
            variable_count: None,
            variables: vec![TestVariable::new("1", &[("5", &numeric(3, 2, "1850"))])],
        }
    }
}

impl CastBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_variables(mut self, variables: Vec<TestVariable>) -> Self {
        self.variables = variables;
        self
    }

    pub fn build(&self) -> String {
        let variable_count = self
            .variable_count
            .clone()
            .unwrap_or_else(|| format!("{:02}", self.variables.len()));
        let mut out = String::from("C");
        for part in [
            &self.profile_bytes,
            &self.cast_number,
            &self.country,
            &self.cruise,
            &self.year,
            &self.month,
            &self.day,
            &self.time,
            &self.latitude,
            &self.longitude,
            &self.levels,
            &self.profile_type,
            &variable_count,
        ] {
            out.push_str(part);
        }
        for variable in &self.variables {
            out.push_str(&variable.encode());
        }
        out
    }
}

#[test]
fn test_builder_default_layout() {
    assert_eq!(
        CastBuilder::new().build(),
        "C3123567890US17202306154421230442-55135521234522500111011153421850"
    );
}
