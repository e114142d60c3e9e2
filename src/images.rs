use std::collections::BTreeMap;

/// Illustration styles rendered for every story. Manifests list one expected
/// image per style; changing this set changes every derived manifest.
pub const IMAGE_STYLES: [&str; 9] = [
    "3d_rendered",
    "cartoon",
    "chibi",
    "flat_design",
    "hand_drawn",
    "real",
    "storybook_illustration",
    "vector_art",
    "watercolor",
];

/// Paged stories always get five image slots per style, independent of how
/// many pages the story JSON actually contains.
pub const PAGES_PER_STORY: usize = 5;

pub type ImageManifest = BTreeMap<&'static str, String>;
pub type PagedImageManifest = BTreeMap<&'static str, Vec<String>>;

/// Expected image filenames for a Markdown story: `{base}-{style}.png`.
pub fn single_image_manifest(file_name: &str) -> ImageManifest {
    let base = file_name.strip_suffix(".md").unwrap_or(file_name);
    IMAGE_STYLES
        .iter()
        .map(|style| (*style, format!("{base}-{style}.png")))
        .collect()
}

/// Expected image filenames for a paged JSON story: `{base}/{page}-{style}.png`
/// for pages 1 through [`PAGES_PER_STORY`].
pub fn paged_image_manifest(file_name: &str) -> PagedImageManifest {
    let base = file_name.strip_suffix(".json").unwrap_or(file_name);
    IMAGE_STYLES
        .iter()
        .map(|style| {
            let pages = (1..=PAGES_PER_STORY)
                .map(|page| format!("{base}/{page}-{style}.png"))
                .collect();
            (*style, pages)
        })
        .collect()
}
