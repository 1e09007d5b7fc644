//! Visual theming for the graph.
//!
//! Provides the fixed category palette, deterministic group coloring, and the
//! style configuration consumed by the renderer.

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	/// Red channel.
	pub r: u8,
	/// Green channel.
	pub g: u8,
	/// Blue channel.
	pub b: u8,
	/// Alpha in `[0, 1]`.
	pub a: f64,
}

impl Color {
	/// Opaque color.
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	/// Color with explicit alpha.
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	/// Same color with alpha replaced.
	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// CSS `rgba(...)` string.
	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#RRGGBB`, `#RGB`, or `rgb()`/`rgba()` notation.
	pub fn parse(s: &str) -> Option<Color> {
		let s = s.trim();
		if let Some(hex) = s.strip_prefix('#') {
			let channel = |i: usize, w: usize| {
				let v = u8::from_str_radix(hex.get(i * w..(i + 1) * w)?, 16).ok()?;
				Some(if w == 1 { v * 17 } else { v })
			};
			let w = match hex.len() {
				6 => 2,
				3 => 1,
				_ => return None,
			};
			return Some(Color::rgb(channel(0, w)?, channel(1, w)?, channel(2, w)?));
		}

		let inner = s
			.strip_prefix("rgba(")
			.or_else(|| s.strip_prefix("rgb("))?
			.strip_suffix(')')?;
		let parts: Vec<&str> = inner.split(',').map(str::trim).collect();
		let r = parts.first()?.parse().ok()?;
		let g = parts.get(1)?.parse().ok()?;
		let b = parts.get(2)?.parse().ok()?;
		let a = match parts.get(3) {
			Some(a) => a.parse().ok()?,
			None => 1.0,
		};
		Some(Color::rgba(r, g, b, a))
	}
}

/// Category palette indexed by group hash.
pub const PALETTE: [Color; 7] = [
	Color::rgb(0x3b, 0x82, 0xf6), // Blue
	Color::rgb(0xef, 0x44, 0x44), // Red
	Color::rgb(0x10, 0xb9, 0x81), // Emerald
	Color::rgb(0xf5, 0x9e, 0x0b), // Amber
	Color::rgb(0x8b, 0x5c, 0xf6), // Violet
	Color::rgb(0xec, 0x48, 0x99), // Pink
	Color::rgb(0x06, 0xb6, 0xd4), // Cyan
];

/// Color for nodes without a group.
pub const DEFAULT_MARKER: Color = Color::rgb(99, 102, 241);

/// Rolling `hash = c + (hash << 5) - hash` over UTF-16 code units, with the
/// shift wrapping at 32 bits.
fn hash_group(group: &str) -> i64 {
	group.encode_utf16().fold(0i64, |hash, c| {
		let shifted = i64::from((hash as i32).wrapping_shl(5));
		i64::from(c) + shifted - hash
	})
}

/// Stable palette color for a group tag. Distinct groups may collide.
pub fn color_for_group(group: Option<&str>) -> Color {
	match group {
		None | Some("") => DEFAULT_MARKER,
		Some(g) => PALETTE[(hash_group(g).unsigned_abs() % PALETTE.len() as u64) as usize],
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Canvas fill.
	pub color: Color,
	/// One-pixel frame around the canvas.
	pub border: Color,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	/// Line color.
	pub color: Color,
	/// Line width in world units.
	pub width: f64,
	/// Arrowhead fill.
	pub arrow_color: Color,
	/// Arrowhead length in world units.
	pub arrow_size: f64,
	/// Gap between the arrow tip and the target circle.
	pub target_gap: f64,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Circle fill under the translucent category tint.
	pub fill: Color,
	/// Category tint opacity.
	pub tint_alpha: f64,
	/// Category tint opacity on selected nodes.
	pub selected_tint_alpha: f64,
	/// Outline width.
	pub stroke_width: f64,
	/// Outline width on selected nodes.
	pub selected_stroke_width: f64,
	/// Stroke color of selected nodes.
	pub selected_stroke: Color,
}

/// Label pill style.
#[derive(Clone, Debug)]
pub struct LabelStyle {
	/// CSS font shorthand.
	pub font: String,
	/// Label text.
	pub text: Color,
	/// Pill fill.
	pub background: Color,
	/// Pill outline.
	pub border: Color,
	/// Horizontal padding around the text.
	pub padding: f64,
	/// Pill height.
	pub height: f64,
}

/// Screen-space overlay text (title and zoom indicator).
#[derive(Clone, Debug)]
pub struct OverlayStyle {
	/// Font of the title.
	pub title_font: String,
	/// Font of the zoom indicator.
	pub hint_font: String,
	/// Title text.
	pub text: Color,
	/// Zoom indicator text.
	pub muted: Color,
	/// Title box fill.
	pub background: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	/// Preset name, as accepted by [`Theme::by_name`].
	pub name: &'static str,
	/// Canvas fill and frame.
	pub background: BackgroundStyle,
	/// Edges and arrowheads.
	pub edge: EdgeStyle,
	/// Node circles.
	pub node: NodeStyle,
	/// Label pills.
	pub label: LabelStyle,
	/// Title and zoom indicator.
	pub overlay: OverlayStyle,
}

impl Theme {
	/// Light card theme (default)
	pub fn light() -> Self {
		Self {
			name: "light",
			background: BackgroundStyle {
				color: Color::rgb(255, 255, 255),
				border: Color::rgba(226, 232, 240, 0.5),
			},
			edge: EdgeStyle {
				color: Color::rgba(203, 213, 225, 0.6),
				width: 2.0,
				arrow_color: Color::rgb(100, 116, 139),
				arrow_size: 6.0,
				target_gap: 4.0,
			},
			node: NodeStyle {
				fill: Color::rgb(255, 255, 255),
				tint_alpha: 0.1,
				selected_tint_alpha: 0.2,
				stroke_width: 2.0,
				selected_stroke_width: 3.0,
				selected_stroke: DEFAULT_MARKER,
			},
			label: LabelStyle {
				font: "500 12px sans-serif".to_string(),
				text: Color::rgb(0, 0, 0),
				background: Color::rgba(255, 255, 255, 0.85),
				border: Color::rgba(0, 0, 0, 0.1),
				padding: 6.0,
				height: 20.0,
			},
			overlay: OverlayStyle {
				title_font: "600 14px sans-serif".to_string(),
				hint_font: "10px sans-serif".to_string(),
				text: Color::rgb(15, 23, 42),
				muted: Color::rgb(100, 116, 139),
				background: Color::rgb(255, 255, 255),
			},
		}
	}

	/// Dark card theme
	pub fn dark() -> Self {
		Self {
			name: "dark",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				border: Color::rgba(48, 54, 61, 0.5),
			},
			edge: EdgeStyle {
				color: Color::rgba(72, 84, 99, 0.6),
				width: 2.0,
				arrow_color: Color::rgb(139, 148, 158),
				arrow_size: 6.0,
				target_gap: 4.0,
			},
			node: NodeStyle {
				fill: Color::rgb(13, 17, 23),
				tint_alpha: 0.1,
				selected_tint_alpha: 0.2,
				stroke_width: 2.0,
				selected_stroke_width: 3.0,
				selected_stroke: Color::rgb(129, 140, 248),
			},
			label: LabelStyle {
				font: "500 12px sans-serif".to_string(),
				text: Color::rgb(0, 0, 0),
				background: Color::rgba(255, 255, 255, 0.85),
				border: Color::rgba(0, 0, 0, 0.1),
				padding: 6.0,
				height: 20.0,
			},
			overlay: OverlayStyle {
				title_font: "600 14px sans-serif".to_string(),
				hint_font: "10px sans-serif".to_string(),
				text: Color::rgb(230, 237, 243),
				muted: Color::rgb(139, 148, 158),
				background: Color::rgb(22, 27, 34),
			},
		}
	}

	/// Looks up a theme by name, falling back to the default.
	pub fn by_name(name: &str) -> Self {
		match name {
			"dark" => Self::dark(),
			_ => Self::light(),
		}
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::light()
	}
}
