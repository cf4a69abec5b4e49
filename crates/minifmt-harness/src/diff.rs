//! Diff rendering for fixture comparison.

/// Render a text diff between expected and actual output.
///
/// Renderings are usually single lines, so each differing line also names the
/// first byte column where the two sides part ways.
#[must_use]
pub fn render_diff(expected: &str, actual: &str) -> String {
    if expected == actual {
        return String::from("[identical]");
    }

    let mut out = String::new();
    out.push_str("--- expected\n");
    out.push_str("+++ actual\n");

    let expected_lines: Vec<&str> = expected.lines().collect();
    let actual_lines: Vec<&str> = actual.lines().collect();
    for i in 0..expected_lines.len().max(actual_lines.len()) {
        match (expected_lines.get(i), actual_lines.get(i)) {
            (Some(e), Some(a)) if e == a => {}
            (Some(e), Some(a)) => {
                out.push_str(&format!("@@ line {}, col {} @@\n", i + 1, first_difference(e, a) + 1));
                out.push_str(&format!("-{e}\n"));
                out.push_str(&format!("+{a}\n"));
            }
            (Some(e), None) => {
                out.push_str(&format!("@@ line {} @@\n", i + 1));
                out.push_str(&format!("-{e}\n"));
            }
            (None, Some(a)) => {
                out.push_str(&format!("@@ line {} @@\n", i + 1));
                out.push_str(&format!("+{a}\n"));
            }
            (None, None) => {}
        }
    }
    out
}

fn first_difference(a: &str, b: &str) -> usize {
    a.bytes()
        .zip(b.bytes())
        .position(|(x, y)| x != y)
        .unwrap_or_else(|| a.len().min(b.len()))
}
