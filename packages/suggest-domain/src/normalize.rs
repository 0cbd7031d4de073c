use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

/// Folds text into the form used for matching: lowercase, decomposed with combining marks
/// dropped, whitespace collapsed to single spaces and trimmed.
pub fn normalize(input: &str) -> String {
	let folded = input.to_lowercase();
	let mut out = String::with_capacity(folded.len());
	let mut pending_space = false;

	for ch in folded.nfd() {
		if is_combining_mark(ch) {
			continue;
		}
		if ch.is_whitespace() {
			pending_space = !out.is_empty();

			continue;
		}
		if pending_space {
			out.push(' ');

			pending_space = false;
		}

		out.push(ch);
	}

	out
}

#[cfg(test)]
mod tests {
	use super::normalize;

	#[test]
	fn strips_diacritics_and_case() {
		assert_eq!(normalize("Café"), normalize("cafe"));
		assert_eq!(normalize("LÁBÓR"), "labor");
	}

	#[test]
	fn handles_precomposed_and_decomposed_input() {
		assert_eq!(normalize("e\u{0301}te\u{0301}"), normalize("\u{00E9}t\u{00E9}"));
	}

	#[test]
	fn collapses_and_trims_whitespace() {
		assert_eq!(normalize("  quis \t  laboris\n"), "quis laboris");
		assert_eq!(normalize(" \t "), "");
	}

	#[test]
	fn is_idempotent() {
		for input in ["Ünïcödé  Náme", "İstanbul", "  Crème\u{00A0}Brûlée "] {
			let once = normalize(input);

			assert_eq!(normalize(&once), once, "Not idempotent for {input:?}");
		}
	}
}
