/// Finds the line at which `content` starts inside rendered output.
///
/// Lines are joined with `\n` and searched for the first literal occurrence of
/// `content`. Returns the zero-based index of the line containing the start of
/// the match, or `None` when `content` is absent or not found.
pub fn locate<S: AsRef<str>>(lines: &[S], content: Option<&str>) -> Option<usize> {
	let content = content?;
	let text = lines.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join("\n");
	let start = text.find(content)?;
	Some(text[..start].matches('\n').count())
}
