/// An open/close delimiter pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pair {
	pub open: u8,
	pub close: u8,
}

/// `(` and `)`, used for statement parameters.
pub const PARENS: Pair = Pair {
	open: b'(',
	close: b')',
};

/// `{` and `}`, used for statement bodies.
pub const BRACES: Pair = Pair {
	open: b'{',
	close: b'}',
};

/// Find the end of the balanced region that opens at `start`.
///
/// Returns the offset just past the close that brings the nesting depth back
/// to zero, or `None` when `start` is not `pair.open` or the document ends
/// first.
pub fn find_region_end(document: &str, pair: Pair, start: usize) -> Option<usize> {
	let bytes = document.as_bytes();
	if bytes.get(start) != Some(&pair.open) {
		return None;
	}

	let mut depth = 1usize;
	for (offset, byte) in bytes.iter().enumerate().skip(start + 1) {
		if *byte == pair.open {
			depth += 1;
		} else if *byte == pair.close {
			depth -= 1;
			if depth == 0 {
				return Some(offset + 1);
			}
		}
	}

	None
}
