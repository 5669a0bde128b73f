//! Utility functions

use rand::RngExt;

pub const ID_LENGTH: usize = 24;
pub const SAFE: [char; 62] = [
	'0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i',
	'j', 'k', 'l', 'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', 'A', 'B',
	'C', 'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
	'V', 'W', 'X', 'Y', 'Z',
];

/// Generate a random alphanumeric id (used for role ids)
pub fn random_id() -> String {
	let mut rng = rand::rng();
	let mut result = String::with_capacity(ID_LENGTH);

	for _ in 0..ID_LENGTH {
		result.push(SAFE[rng.random_range(0..SAFE.len())]);
	}
	result
}

/// Deduplicate codes keeping the first occurrence order
pub fn dedup_codes<I, S>(codes: I) -> Vec<Box<str>>
where
	I: IntoIterator<Item = S>,
	S: AsRef<str>,
{
	let mut seen = std::collections::HashSet::new();
	let mut result = Vec::new();
	for code in codes {
		let code = code.as_ref();
		if seen.insert(code.to_string()) {
			result.push(Box::from(code));
		}
	}
	result
}


// vim: ts=4
