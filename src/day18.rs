// Copyright (c) 2022 Bastiaan Marinus van de Weerd


mod snailfish {
	use std::fmt::{self, Write as _};

	const EXPLODE_DEPTH: usize = 4;
	const SPLIT_THRESHOLD: u32 = 10;

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	enum Node {
		Regular(u32),
		Pair(usize, usize),
	}

	#[derive(Debug, Clone)]
	struct Slot {
		node: Node,
		parent: Option<usize>,
	}

	/// A snailfish number. Its nodes live in `slots` and refer to their
	/// children and parent by index; `free` holds slots left behind by
	/// explosions, to be reused by splits.
	#[derive(Debug, Clone, Default)]
	pub(crate) struct Number {
		slots: Vec<Slot>,
		free: Vec<usize>,
		root: Option<usize>,
	}

	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub(super) enum Reduction { Explode, Split }

	#[derive(Clone, Copy)]
	enum Side { Left, Right }

	impl Number {
		fn alloc(&mut self, node: Node, parent: Option<usize>) -> usize {
			let slot = Slot { node, parent };
			if let Some(idx) = self.free.pop() {
				self.slots[idx] = slot;
				idx
			} else {
				self.slots.push(slot);
				self.slots.len() - 1
			}
		}

		pub(super) fn leaf(&mut self, value: u32) -> usize {
			self.alloc(Node::Regular(value), None)
		}

		pub(super) fn pair(&mut self, left: usize, right: usize) -> usize {
			let idx = self.alloc(Node::Pair(left, right), None);
			self.slots[left].parent = Some(idx);
			self.slots[right].parent = Some(idx);
			idx
		}

		pub(super) fn with_root(mut self, root: usize) -> Self {
			self.root = Some(root);
			self
		}

		/// Puts `self` on the left and `rhs` on the right of a new root pair,
		/// without reducing.
		pub(super) fn join(mut self, rhs: Number) -> Number {
			let Some(rhs_root) = rhs.root else { return self };
			let Some(lhs_root) = self.root else { return rhs };

			let offset = self.slots.len();
			self.slots.extend(rhs.slots.into_iter().map(|Slot { node, parent }| Slot {
				node: match node {
					Node::Pair(left, right) => Node::Pair(left + offset, right + offset),
					regular => regular,
				},
				parent: parent.map(|p| p + offset),
			}));
			self.free.extend(rhs.free.into_iter().map(|idx| idx + offset));

			let root = self.pair(lhs_root, rhs_root + offset);
			self.with_root(root)
		}

		/// Returns the leftmost pair of two regular numbers nested inside
		/// at least four pairs, with its children and their values.
		fn explodable(&self) -> Option<(usize, [usize; 2], [u32; 2])> {
			let mut stack = Vec::from_iter(self.root.map(|root| (root, 0)));
			while let Some((idx, depth)) = stack.pop() {
				let Node::Pair(left, right) = self.slots[idx].node else { continue };
				match (self.slots[left].node, self.slots[right].node) {
					(Node::Regular(l), Node::Regular(r)) if depth >= EXPLODE_DEPTH =>
						return Some((idx, [left, right], [l, r])),
					_ => {
						stack.push((right, depth + 1));
						stack.push((left, depth + 1));
					}
				}
			}
			None
		}

		/// Returns the leftmost regular number of ten or more, with its value.
		fn splittable(&self) -> Option<(usize, u32)> {
			let mut stack = Vec::from_iter(self.root);
			while let Some(idx) = stack.pop() {
				match self.slots[idx].node {
					Node::Regular(value) if value >= SPLIT_THRESHOLD => return Some((idx, value)),
					Node::Regular(_) => (),
					Node::Pair(left, right) => {
						stack.push(right);
						stack.push(left);
					}
				}
			}
			None
		}

		/// Returns the regular number closest to `idx` on the given side, if any.
		fn neighbor(&self, mut idx: usize, side: Side) -> Option<usize> {
			// Climb until `idx` is a right child (looking left) or a left child (looking right)
			let mut idx = loop {
				let parent = self.slots[idx].parent?;
				if let Node::Pair(left, right) = self.slots[parent].node {
					match side {
						Side::Left if idx == right => break left,
						Side::Right if idx == left => break right,
						_ => (),
					}
				}
				idx = parent;
			};
			while let Node::Pair(left, right) = self.slots[idx].node {
				idx = match side { Side::Left => right, Side::Right => left };
			}
			Some(idx)
		}

		fn explode(&mut self, idx: usize, children: [usize; 2], values: [u32; 2]) {
			for (side, value) in [(Side::Left, values[0]), (Side::Right, values[1])] {
				let Some(neighbor) = self.neighbor(idx, side) else { continue };
				if let Node::Regular(regular) = &mut self.slots[neighbor].node { *regular += value }
			}
			self.slots[idx].node = Node::Regular(0);
			self.free.extend(children);
		}

		fn split(&mut self, idx: usize, value: u32) {
			use num_integer::Integer;
			let left = self.alloc(Node::Regular(Integer::div_floor(&value, &2)), Some(idx));
			let right = self.alloc(Node::Regular(Integer::div_ceil(&value, &2)), Some(idx));
			self.slots[idx].node = Node::Pair(left, right);
		}

		/// Applies the first applicable rewrite, explosions taking priority
		/// over splits. Returns `None` once the number is in normal form.
		pub(super) fn reduce_step(&mut self) -> Option<Reduction> {
			if let Some((idx, children, values)) = self.explodable() {
				self.explode(idx, children, values);
				Some(Reduction::Explode)
			} else if let Some((idx, value)) = self.splittable() {
				self.split(idx, value);
				Some(Reduction::Split)
			} else {
				None
			}
		}

		pub(super) fn reduce(&mut self) {
			while let Some(_reduction) = self.reduce_step() {
				#[cfg(LOGGING)]
				println!("after {_reduction:?}: {self}");
			}
		}

		pub(super) fn magnitude(&self) -> u64 {
			fn magnitude(slots: &[Slot], idx: usize) -> u64 {
				match slots[idx].node {
					Node::Regular(value) => value.into(),
					Node::Pair(left, right) => 3 * magnitude(slots, left) + 2 * magnitude(slots, right),
				}
			}
			self.root.map_or(0, |root| magnitude(&self.slots, root))
		}

		/// Panics if a reachable node’s parent link disagrees with its pair.
		#[cfg(test)]
		pub(super) fn assert_links(&self) {
			let Some(root) = self.root else { return };
			assert_eq!(self.slots[root].parent, None);
			let mut stack = vec![root];
			while let Some(idx) = stack.pop() {
				if let Node::Pair(left, right) = self.slots[idx].node {
					assert_eq!(self.slots[left].parent, Some(idx));
					assert_eq!(self.slots[right].parent, Some(idx));
					assert!(!self.free.contains(&left) && !self.free.contains(&right));
					stack.extend([left, right]);
				}
			}
		}
	}

	#[cfg(test)]
	impl From<u32> for Number {
		fn from(value: u32) -> Self {
			let mut number = Number::default();
			let root = number.leaf(value);
			number.with_root(root)
		}
	}

	impl std::ops::Add for Number {
		type Output = Number;
		fn add(self, rhs: Number) -> Number {
			if self.root.is_none() { return rhs }
			let mut sum = self.join(rhs);
			sum.reduce();
			sum
		}
	}

	impl std::iter::Sum for Number {
		fn sum<I: Iterator<Item = Number>>(iter: I) -> Number {
			iter.fold(Number::default(), std::ops::Add::add)
		}
	}

	impl fmt::Display for Number {
		fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
			fn fmt_node(slots: &[Slot], idx: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				match slots[idx].node {
					Node::Regular(value) => write!(f, "{value}"),
					Node::Pair(left, right) => {
						f.write_char('[')?;
						fmt_node(slots, left, f)?;
						f.write_char(',')?;
						fmt_node(slots, right, f)?;
						f.write_char(']')
					}
				}
			}
			match self.root {
				Some(root) => fmt_node(&self.slots, root, f),
				None => Ok(()),
			}
		}
	}
}


use snailfish::Number;
pub(crate) use parsing::NumbersError;


fn part1_impl(input_numbers: Vec<Number>) -> u64 {
	input_numbers.into_iter().sum::<Number>().magnitude()
}

pub(crate) fn part1(s: &str) -> Result<u64, NumbersError> {
	parsing::try_numbers_from_str(s).map(part1_impl)
}


fn part2_impl(input_numbers: Vec<Number>) -> u64 {
	// Every ordered pair, each number paired with itself included
	itertools::iproduct!(&input_numbers, &input_numbers)
		.map(|(a, b)| (a.clone() + b.clone()).magnitude())
		.max()
		.unwrap_or(0)
}

pub(crate) fn part2(s: &str) -> Result<u64, NumbersError> {
	parsing::try_numbers_from_str(s).map(part2_impl)
}


mod parsing {
	use super::snailfish::Number;
	use std::str::FromStr;

	#[allow(dead_code)]
	#[derive(Debug, PartialEq, Eq)]
	pub(crate) enum NumberError {
		Empty,
		Character { column: usize, found: char },
		Underflow { column: usize },
		Unclosed { column: usize },
		Trailing { roots: usize },
	}

	enum Item { Open(usize), Node(usize) }

	impl FromStr for Number {
		type Err = NumberError;
		fn from_str(s: &str) -> Result<Self, Self::Err> {
			use NumberError::*;

			let mut number = Number::default();
			let mut stack = Vec::new();
			for (c, chr) in s.chars().enumerate() {
				match chr {
					',' => (),
					'[' => stack.push(Item::Open(c + 1)),
					']' => {
						let (
							Some(Item::Node(right)),
							Some(Item::Node(left)),
							Some(Item::Open(_)),
						) = (stack.pop(), stack.pop(), stack.pop()) else {
							return Err(Underflow { column: c + 1 })
						};
						stack.push(Item::Node(number.pair(left, right)));
					}
					found => {
						let value = found.to_digit(10).ok_or(Character { column: c + 1, found })?;
						stack.push(Item::Node(number.leaf(value)));
					}
				}
			}

			if let Some(&Item::Open(column)) = stack.iter().find(|item| matches!(item, Item::Open(_))) {
				return Err(Unclosed { column })
			}
			match stack.as_slice() {
				[] => Err(Empty),
				&[Item::Node(root)] => Ok(number.with_root(root)),
				roots => Err(Trailing { roots: roots.len() }),
			}
		}
	}

	#[allow(dead_code)]
	#[derive(Debug, PartialEq, Eq)]
	pub(crate) struct NumbersError { pub(super) line: usize, pub(super) source: NumberError }

	pub(super) fn try_numbers_from_str(s: &str) -> Result<Vec<Number>, NumbersError> {
		s.lines()
			.enumerate()
			.map(|(l, line)| line.parse()
				.map_err(|e| NumbersError { line: l + 1, source: e }))
			.collect()
	}
}
