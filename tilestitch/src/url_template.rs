//! Tile URL templates with `{z}`, `{x}`, `{y}` and `{s}` placeholders.
//!
//! Each template is one mosaic *layer*; layers are composited in the order
//! given, later ones on top. Templates are validated at construction, so a
//! typo in a placeholder fails the run before any network access.

use std::fmt::{self, Debug, Display};
use std::sync::LazyLock;
use tilestitch_core::{StitchError, StitchResult, TileCoord};

/// Subdomain letters substituted for `{s}`.
///
/// The common load-balancing convention of tile providers; which letter a
/// tile gets has no effect on the mosaic, so it is picked deterministically
/// by cycling over the tile coordinates.
const SUBDOMAINS: [&str; 3] = ["a", "b", "c"];

static RE_PLACEHOLDER: LazyLock<regex::Regex> = LazyLock::new(|| regex::Regex::new(r"\{([^{}]*)\}").unwrap());

/// A validated tile URL template.
///
/// # Examples
///
/// ```
/// use tilestitch::TileUrlTemplate;
/// use tilestitch_core::TileCoord;
///
/// let template = TileUrlTemplate::new("https://{s}.tiles.example/{z}/{x}/{y}.png").unwrap();
/// let coord = TileCoord::new(7, 66, 42).unwrap();
/// assert_eq!(template.url_for(&coord), "https://a.tiles.example/7/66/42.png");
///
/// assert!(TileUrlTemplate::new("https://tiles.example/{zoom}/{x}/{y}.png").is_err());
/// ```
#[derive(Clone, PartialEq)]
pub struct TileUrlTemplate {
	template: String,
}

impl TileUrlTemplate {
	/// Validates the template's placeholders.
	///
	/// # Errors
	///
	/// Fails with [`StitchError::UnknownUrlToken`] for any `{token}` other
	/// than `{z}`, `{x}`, `{y}` or `{s}`.
	pub fn new(template: &str) -> StitchResult<TileUrlTemplate> {
		for capture in RE_PLACEHOLDER.captures_iter(template) {
			match &capture[1] {
				"z" | "x" | "y" | "s" => {}
				token => {
					return Err(StitchError::UnknownUrlToken {
						token: token.to_string(),
						template: template.to_string(),
					});
				}
			}
		}
		Ok(TileUrlTemplate {
			template: template.to_string(),
		})
	}

	/// The URL of one tile, with all placeholders substituted.
	pub fn url_for(&self, coord: &TileCoord) -> String {
		let subdomain = SUBDOMAINS[((coord.x + coord.y) as usize) % SUBDOMAINS.len()];
		RE_PLACEHOLDER
			.replace_all(&self.template, |capture: &regex::Captures| match &capture[1] {
				"z" => coord.level.to_string(),
				"x" => coord.x.to_string(),
				"y" => coord.y.to_string(),
				_ => subdomain.to_string(),
			})
			.into_owned()
	}
}

impl Debug for TileUrlTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "TileUrlTemplate({})", self.template)
	}
}

impl Display for TileUrlTemplate {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.template)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[test]
	fn substitutes_all_placeholders() {
		let template = TileUrlTemplate::new("https://tiles.example/{z}/{x}/{y}.png").unwrap();
		let coord = TileCoord::new(12, 2200, 1343).unwrap();
		assert_eq!(template.url_for(&coord), "https://tiles.example/12/2200/1343.png");
	}

	#[test]
	fn repeated_placeholders_are_all_substituted() {
		let template = TileUrlTemplate::new("mock://{z}/{x}/{y}?again={y}").unwrap();
		let coord = TileCoord::new(3, 1, 2).unwrap();
		assert_eq!(template.url_for(&coord), "mock://3/1/2?again=2");
	}

	#[test]
	fn subdomains_cycle_deterministically() {
		let template = TileUrlTemplate::new("https://{s}.tiles.example/{z}/{x}/{y}.png").unwrap();
		let urls: Vec<String> = (0..3)
			.map(|x| template.url_for(&TileCoord::new(5, x, 0).unwrap()))
			.collect();
		assert!(urls[0].starts_with("https://a."));
		assert!(urls[1].starts_with("https://b."));
		assert!(urls[2].starts_with("https://c."));

		// the same tile always resolves to the same URL
		assert_eq!(
			template.url_for(&TileCoord::new(5, 1, 0).unwrap()),
			template.url_for(&TileCoord::new(5, 1, 0).unwrap())
		);
	}

	#[test]
	fn templates_without_subdomains_work_unchanged() {
		let template = TileUrlTemplate::new("https://tiles.example/{z}/{x}/{y}.png").unwrap();
		assert!(!template.url_for(&TileCoord::new(1, 0, 0).unwrap()).contains('{'));
	}

	#[rstest]
	#[case("https://tiles.example/{zoom}/{x}/{y}.png", "zoom")]
	#[case("https://tiles.example/{z}/{x}/{y}.{ext}", "ext")]
	#[case("https://tiles.example/{}/{x}/{y}.png", "")]
	fn rejects_unknown_tokens(#[case] template: &str, #[case] token: &str) {
		match TileUrlTemplate::new(template) {
			Err(StitchError::UnknownUrlToken { token: t, .. }) => assert_eq!(t, token),
			other => panic!("expected UnknownUrlToken, got {other:?}"),
		}
	}

	#[test]
	fn plain_urls_are_valid_templates() {
		assert!(TileUrlTemplate::new("https://tiles.example/static.png").is_ok());
	}
}
