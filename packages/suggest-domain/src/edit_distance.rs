/// Levenshtein distance between two strings, counted in chars.
pub fn levenshtein(a: &str, b: &str) -> usize {
	let a_chars: Vec<char> = a.chars().collect();
	let b_chars: Vec<char> = b.chars().collect();

	if a_chars.is_empty() {
		return b_chars.len();
	}
	if b_chars.is_empty() {
		return a_chars.len();
	}

	let mut prev_row: Vec<usize> = (0..=b_chars.len()).collect();
	let mut curr_row = vec![0_usize; b_chars.len() + 1];

	for (i, a_char) in a_chars.iter().enumerate() {
		curr_row[0] = i + 1;

		for (j, b_char) in b_chars.iter().enumerate() {
			let cost = usize::from(a_char != b_char);

			curr_row[j + 1] =
				(prev_row[j + 1] + 1).min(curr_row[j] + 1).min(prev_row[j] + cost);
		}

		std::mem::swap(&mut prev_row, &mut curr_row);
	}

	prev_row[b_chars.len()]
}

#[cfg(test)]
mod tests {
	use super::levenshtein;

	#[test]
	fn identical_strings_have_zero_distance() {
		assert_eq!(levenshtein("labor", "labor"), 0);
	}

	#[test]
	fn counts_insertions_deletions_and_substitutions() {
		assert_eq!(levenshtein("labor", "labore"), 1);
		assert_eq!(levenshtein("labore", "labor"), 1);
		assert_eq!(levenshtein("kitten", "sitting"), 3);
	}

	#[test]
	fn empty_side_costs_full_length() {
		assert_eq!(levenshtein("", "abc"), 3);
		assert_eq!(levenshtein("abc", ""), 3);
	}

	#[test]
	fn counts_chars_not_bytes() {
		assert_eq!(levenshtein("ß", "s"), 1);
	}
}
