//! Activity names derived from test function names.
//!
//! The [`activity!`](crate::activity!) macro groups a block of steps under an
//! activity named after the enclosing function, so a test called
//! `test_login_flow` (or `testLoginFlow`) shows up as "Test login flow" in
//! the report without repeating the name by hand.

use regex::Regex;
use std::sync::OnceLock;

const MARKER_SUFFIX: &str = "::__apptest_marker";

fn camel_case_boundary() -> Option<&'static Regex> {
    static BOUNDARY: OnceLock<Option<Regex>> = OnceLock::new();
    BOUNDARY
        .get_or_init(|| Regex::new(r"([a-z0-9])([A-Z])").ok())
        .as_ref()
}

/// Turn a function name or path into a sentence.
///
/// Takes the last path segment that is not a closure, drops anything from the
/// first `(`, splits on underscores and lower-to-upper case boundaries, then
/// lowercases everything but the first letter.
///
/// ```
/// use apptest::activity::activity_name_from_function;
///
/// assert_eq!(activity_name_from_function("test_login_flow"), "Test login flow");
/// assert_eq!(activity_name_from_function("testLoginFlow()"), "Test login flow");
/// assert_eq!(
///     activity_name_from_function("suite::login::test_logout::{{closure}}"),
///     "Test logout"
/// );
/// ```
#[must_use]
pub fn activity_name_from_function(function: &str) -> String {
    let path = function.strip_suffix(MARKER_SUFFIX).unwrap_or(function);
    let name = path
        .rsplit("::")
        .find(|segment| !segment.is_empty() && !segment.starts_with("{{"))
        .unwrap_or(path);
    let name = name.split('(').next().unwrap_or(name);

    let spaced = match camel_case_boundary() {
        Some(boundary) => boundary.replace_all(name, "$1 $2").into_owned(),
        None => name.to_string(),
    };
    let sentence = spaced
        .split(|c: char| c == '_' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();

    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => sentence,
    }
}

#[doc(hidden)]
pub fn __type_name_of<T>(_: T) -> &'static str {
    std::any::type_name::<T>()
}

/// Run a block as a named activity on a [`TestContext`](crate::context::TestContext).
///
/// Without a name the activity is named after the enclosing function.
///
/// ```
/// use apptest::{activity, TestContext};
///
/// fn test_login_flow(ctx: &TestContext) -> u32 {
///     activity!(ctx, || 7)
/// }
///
/// let ctx = TestContext::new();
/// assert_eq!(test_login_flow(&ctx), 7);
/// assert_eq!(ctx.reporter().activities()[0].name, "Test login flow");
///
/// activity!(ctx, "Open settings", || ());
/// assert_eq!(ctx.reporter().activities()[1].name, "Open settings");
/// ```
#[macro_export]
macro_rules! activity {
    ($ctx:expr, $name:expr, $body:expr $(,)?) => {
        $ctx.run($name, $body)
    };
    ($ctx:expr, $body:expr $(,)?) => {{
        fn __apptest_marker() {}
        let name = $crate::activity::activity_name_from_function(
            $crate::activity::__type_name_of(__apptest_marker),
        );
        $ctx.run(&name, $body)
    }};
}
