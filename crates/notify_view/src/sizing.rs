use unicode_width::UnicodeWidthStr;

/// Cap applied when no maximum is configured.
pub const DEFAULT_MAX: usize = 1000;

/// Computes window dimensions for rendered lines.
///
/// Width is the widest line in display columns, at least `min_width` and at
/// most `max_width`. Height is the line count, at most `max_height`. An absent
/// or zero maximum falls back to [`DEFAULT_MAX`].
pub fn size<S: AsRef<str>>(lines: &[S], min_width: usize, max_width: Option<usize>, max_height: Option<usize>) -> (usize, usize) {
	let natural = lines.iter().map(|l| l.as_ref().width()).max().unwrap_or(0);
	let width = natural.max(min_width).min(cap(max_width));
	let height = lines.len().min(cap(max_height));
	(width, height)
}

fn cap(max: Option<usize>) -> usize {
	max.filter(|&m| m > 0).unwrap_or(DEFAULT_MAX)
}
