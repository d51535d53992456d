//! Yes/no confirmation capability for destructive edits.

/// Asks the user whether a destructive edit should go ahead.
///
/// Editors implement this with a dialog; tests pass a closure returning a fixed answer.
///
/// ```
/// use jaae_types::anim::Confirm;
///
/// let mut asked = 0;
/// let mut confirm = |_title: &str, _question: &str| {
///     asked += 1;
///     false
/// };
/// assert!(!confirm.confirm("Remove frame", "Remove anyways?"));
/// drop(confirm);
/// assert_eq!(asked, 1);
/// ```
pub trait Confirm {
	/// Returns `true` to proceed.
	fn confirm(&mut self, title: &str, question: &str) -> bool;
}

impl<F> Confirm for F
where
	F: FnMut(&str, &str) -> bool,
{
	fn confirm(&mut self, title: &str, question: &str) -> bool {
		self(title, question)
	}
}
