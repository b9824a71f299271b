use std::collections::BTreeSet;

/// Describes how two formula lists differ. Parts are joined with `"; "`.
///
/// Inline differences are reported as sorted set differences; display
/// differences by count and by index.
pub fn formula_diff(
    source_inline: &[String],
    target_inline: &[String],
    source_display: &[String],
    target_display: &[String],
) -> String {
    let mut parts = Vec::new();

    let src: BTreeSet<&str> = source_inline.iter().map(String::as_str).collect();
    let tgt: BTreeSet<&str> = target_inline.iter().map(String::as_str).collect();
    let missing: Vec<_> = src.difference(&tgt).map(|f| format!("${}$", f)).collect();
    let extra: Vec<_> = tgt.difference(&src).map(|f| format!("${}$", f)).collect();
    if !missing.is_empty() {
        parts.push(format!("Missing inline formulas: {}", missing.join(", ")));
    }
    if !extra.is_empty() {
        parts.push(format!("Extra inline formulas: {}", extra.join(", ")));
    }

    if source_display != target_display {
        parts.push(format!(
            "Display formulas mismatch: source has {}, target has {}",
            source_display.len(),
            target_display.len()
        ));
        for (i, (a, b)) in source_display.iter().zip(target_display).enumerate() {
            if a != b {
                parts.push(format!("display formula at index {} differs", i));
            }
        }
        if source_display.len() != target_display.len() {
            parts.push(format!(
                "count mismatch: {} vs {}",
                source_display.len(),
                target_display.len()
            ));
        }
    }

    parts.join("; ")
}
