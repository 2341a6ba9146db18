use std::fmt;

/// Branch name for an experiment, always a clean slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    pub fn new(raw: &str) -> Self {
        Self(slugify(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A local branch as listed by `experiment list`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Experiment {
    pub name: String,
    pub current: bool,
}

fn slugify(input: &str) -> String {
    let clean = input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '-'
            }
        })
        .collect::<String>();

    let trimmed = clean.trim_matches('-');
    let mut result = String::with_capacity(trimmed.len());
    let mut prev_dash = false;
    for ch in trimmed.chars() {
        if ch == '-' {
            if !prev_dash {
                result.push(ch);
            }
            prev_dash = true;
        } else {
            result.push(ch);
            prev_dash = false;
        }
    }
    if result.is_empty() {
        "experiment".to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugifies_experiment_name() {
        let name = ExperimentName::new("Try a Darker Theme!");
        assert_eq!(name.as_str(), "try-a-darker-theme");
    }

    #[test]
    fn collapses_separators() {
        assert_eq!(ExperimentName::new("  new // layout__v2 ").as_str(), "new-layout-v2");
    }

    #[test]
    fn empty_name_gets_placeholder() {
        assert_eq!(ExperimentName::new("???").as_str(), "experiment");
        assert_eq!(ExperimentName::new("").as_str(), "experiment");
    }
}
