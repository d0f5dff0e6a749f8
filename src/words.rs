//! Word catalog
//!
//! Static categorized word lists the round scheduler draws secrets from.

use rand::seq::SliceRandom;
use rand::Rng;

/// A named list of words
pub type Category = (&'static str, &'static [&'static str]);

/// A secret word together with the category it was drawn from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickedWord {
    pub word: &'static str,
    pub category: Option<&'static str>,
}

/// In-memory word catalog
///
/// Selection is a two-stage uniform choice: first a category, then a word
/// inside it. Small categories are therefore picked more often per word
/// than large ones.
#[derive(Debug, Clone, Copy)]
pub struct WordCatalog {
    categories: &'static [Category],
}

impl WordCatalog {
    /// Catalog over the given categories
    pub const fn new(categories: &'static [Category]) -> Self {
        Self { categories }
    }

    /// The built-in catalog
    pub const fn builtin() -> Self {
        Self::new(BUILTIN)
    }

    pub fn categories(&self) -> &'static [Category] {
        self.categories
    }

    /// Pick a word (and its category)
    ///
    /// Falls back to a uniform pick over every word, without a category,
    /// when the chosen category is empty. Returns None only for a catalog
    /// with no words at all.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Option<PickedWord> {
        let &(name, words) = self.categories.choose(rng)?;
        if let Some(&word) = words.choose(rng) {
            return Some(PickedWord {
                word,
                category: Some(name),
            });
        }

        let total: usize = self.categories.iter().map(|(_, words)| words.len()).sum();
        if total == 0 {
            return None;
        }
        let word = self
            .categories
            .iter()
            .flat_map(|&(_, words)| words.iter().copied())
            .nth(rng.gen_range(0..total))?;
        Some(PickedWord {
            word,
            category: None,
        })
    }
}

impl Default for WordCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

const BUILTIN: &[Category] = &[
    (
        "animals",
        &[
            "ant", "bear", "bird", "butterfly", "camel", "cat", "chicken", "cow", "crab",
            "crocodile", "deer", "dog", "dolphin", "donkey", "dragonfly", "duck", "eagle",
            "elephant", "fish", "flamingo", "fox", "frog", "giraffe", "goat", "gorilla",
            "hamster", "hedgehog", "hippo", "horse", "jellyfish", "kangaroo", "koala",
            "ladybug", "leopard", "lion", "lizard", "monkey", "mouse", "octopus", "ostrich",
            "owl", "panda", "parrot", "peacock", "penguin", "pig", "polar bear", "rabbit",
            "raccoon", "rhino", "seahorse", "shark", "sheep", "snail", "snake", "spider",
            "squid", "squirrel", "swan", "tiger", "turtle", "walrus", "whale", "wolf", "zebra",
            "dinosaur",
        ],
    ),
    (
        "foods",
        &[
            "apple", "avocado", "banana", "bread", "burger", "cake", "carrot", "cheese",
            "cherry", "chocolate", "cookie", "corn", "croissant", "cucumber", "donut", "egg",
            "eggplant", "fish stick", "fries", "grapes", "hot dog", "ice cream", "jam", "kiwi",
            "lemon", "lollipop", "mango", "milk", "mushroom", "noodles", "nut", "onion",
            "orange", "pancakes", "peanut butter", "pear", "peas", "pepper", "pineapple",
            "pizza", "popcorn", "pumpkin", "rice", "salad", "sandwich", "sausage", "spaghetti",
            "spinach", "strawberry", "sushi", "taco", "tomato", "watermelon", "yogurt",
            "coffee", "teacup", "bottle", "juice box",
        ],
    ),
    (
        "places",
        &[
            "amusement park", "airport", "bakery", "balcony", "bank", "beach", "bedroom",
            "bridge", "bus stop", "camping tent", "castle", "classroom", "coffee shop",
            "desert", "farm", "forest", "garden", "gym", "hospital", "hotel", "ice rink",
            "island", "kitchen", "library", "lighthouse", "living room", "market", "mountain",
            "museum", "ocean", "park", "playground", "police station", "restaurant", "school",
            "stadium", "station", "supermarket", "swimming pool", "theater", "train station",
            "treehouse", "village", "volcano", "waterfall", "zoo",
        ],
    ),
    (
        "objects",
        &[
            "backpack", "balloon", "basket", "bed", "bench", "bicycle", "binoculars", "book",
            "broom", "bucket", "calculator", "calendar", "camera", "candle", "chair", "clock",
            "comb", "couch", "cup", "desk", "door", "drawer", "drum", "fan", "flag",
            "flashlight", "fridge", "glasses", "hammer", "hat", "helmet", "key", "kite",
            "ladder", "lamp", "mirror", "mop", "paintbrush", "pencil", "pillow", "plug",
            "present", "ring", "roller skates", "rope", "ruler", "scissors", "screwdriver",
            "shoelace", "sock", "sofa", "spoon", "suitcase", "table", "teddy bear",
            "toothbrush", "toothpaste", "trash can", "umbrella", "vase", "wallet",
            "washing machine", "whistle", "window", "bus", "car", "train", "motorcycle",
        ],
    ),
    (
        "tech",
        &[
            "battery", "camera", "charger", "computer", "controller", "drone", "earphones",
            "game console", "headphones", "keyboard", "laptop", "light bulb", "microphone",
            "mouse", "phone", "printer", "projector", "remote", "robot", "rocket", "screen",
            "smartwatch", "spaceship", "tablet", "television", "usb cable", "wifi router",
        ],
    ),
    (
        "fantasy",
        &[
            "alien", "angel", "castle tower", "crystal ball", "dragon", "fairy", "genie",
            "ghost", "giant", "goblin", "knight", "mermaid", "magic carpet", "magic wand",
            "pirate", "princess", "robot knight", "superhero", "treasure chest", "unicorn",
            "vampire", "wizard", "zombie",
        ],
    ),
    (
        "nature",
        &[
            "beach wave", "bush", "cactus", "cloud", "desert dune", "flower", "forest path",
            "hill", "leaf", "lightning", "moon", "mountain peak", "mushroom", "rainbow",
            "raindrop", "river", "rock", "sandcastle", "snowflake", "snowman", "star", "sun",
            "sunflower", "tree", "tree stump", "volcano", "waterfall", "wind",
        ],
    ),
    (
        "sports",
        &[
            "badminton", "basketball", "bowling", "boxing glove", "cricket bat", "fishing rod",
            "football", "goalkeeper", "gymnast", "hockey stick", "medal", "ping pong",
            "race car", "referee", "running shoe", "scoreboard", "skateboard", "skiing",
            "stadium", "surfboard", "swimmer", "tennis racket", "trophy", "whistle",
        ],
    ),
    (
        "music",
        &[
            "accordion", "band stage", "cello", "drums", "guitar", "headphones", "microphone",
            "piano", "radio", "singer", "stage", "trumpet", "violin", "xylophone",
        ],
    ),
];
