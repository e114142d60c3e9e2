use serde::Serialize;

/// A thematic category of stories. `slug` is the external identifier used in
/// request paths; `folder` is the directory name inside the story repository.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Topic {
    pub name: &'static str,
    pub slug: &'static str,
    pub folder: &'static str,
}

static TOPICS: [Topic; 5] = [
    Topic {
        name: "Air Pollution Reduction",
        slug: "air_pollution_reduction",
        folder: "Air Pollution Reduction",
    },
    Topic {
        name: "Animal Protection",
        slug: "animal_protection",
        folder: "Animal Protection",
    },
    Topic {
        name: "Tree Preservation",
        slug: "tree_preservation",
        folder: "Tree Preservation",
    },
    Topic {
        name: "Waste Reduction",
        slug: "waste_reduction",
        folder: "Waste Reduction",
    },
    Topic {
        name: "Water Conservation",
        slug: "water_conservation",
        folder: "Water Conservation",
    },
];

pub fn all() -> &'static [Topic] {
    &TOPICS
}

pub fn find(slug: &str) -> Option<&'static Topic> {
    TOPICS.iter().find(|topic| topic.slug == slug)
}
