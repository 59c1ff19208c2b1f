use super::Region;

pub mod xinmin;

pub use xinmin::XinminScraper;

pub const REGION: Region = Region {
    name: "shanghai",
    emoji: "🏙️",
};
