use crate::reporter::model::Outcome;

pub const ASSERTION_ERROR: &str = "java.lang.AssertionError";
pub const SKIP_EXCEPTION: &str = "org.testng.SkipException";

/// Exception details attached to a step by the remote engine.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExceptionInfo {
    pub class: Option<String>,
    pub message: Option<String>,
}

/// Classification-relevant view of a `test-method` node.
#[derive(Debug, Clone, PartialEq)]
pub struct RawStatus<'a> {
    pub status: &'a str,
    pub config: bool,
    pub exception: Option<&'a ExceptionInfo>,
}

/// Exception classes that change how a raw status is read.
///
/// The remote engine reports "not relevant for this configuration" both as
/// a failing setup assertion and as a deliberate skip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationTable {
    /// A failing configuration step with one of these is not applicable.
    pub config_failure_exceptions: Vec<String>,
    /// A skipped step with one of these is not applicable.
    pub skip_exceptions: Vec<String>,
}

impl Default for ClassificationTable {
    fn default() -> Self {
        Self {
            config_failure_exceptions: vec![ASSERTION_ERROR.to_owned()],
            skip_exceptions: vec![SKIP_EXCEPTION.to_owned()],
        }
    }
}

impl ClassificationTable {
    pub fn classify(&self, step: &RawStatus) -> Outcome {
        match step.status {
            "PASS" => Outcome::Pass,
            "FAIL" => {
                let class = step.exception.and_then(|e| e.class.as_deref());
                match class {
                    Some(class)
                        if step.config && matches_any(class, &self.config_failure_exceptions) =>
                    {
                        Outcome::NotApplicable
                    }
                    _ => Outcome::Fail,
                }
            }
            "SKIP" => match step.exception.and_then(|e| e.class.as_deref()) {
                Some(class) if !matches_any(class, &self.skip_exceptions) => Outcome::Skipped,
                _ => Outcome::NotApplicable,
            },
            _ => Outcome::Undefined,
        }
    }
}

fn matches_any(class: &str, candidates: &[String]) -> bool {
    candidates.iter().any(|candidate| same_class(class, candidate))
}

// Case-insensitive, and a bare simple name matches its qualified form.
fn same_class(class: &str, candidate: &str) -> bool {
    let class = class.trim();
    if class.eq_ignore_ascii_case(candidate) {
        return true;
    }
    let simple = |name: &str| name.rsplit('.').next().unwrap_or(name).to_owned();
    let (class_simple, candidate_simple) = (simple(class), simple(candidate));
    (class_simple.len() == class.len() || candidate_simple.len() == candidate.len())
        && class_simple.eq_ignore_ascii_case(&candidate_simple)
}
