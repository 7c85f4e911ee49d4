//! Subject-to-genre mapping
//!
//! Lookup sources return free-form subject strings ("Fantasy fiction",
//! "Detective and mystery stories", ...). They are folded into a fixed
//! taxonomy through an ordered keyword table: specific fiction sub-genres
//! first, the generic "fiction" fallback next, then non-fiction.
//!
//! Keywords match at the start of a word, so "teen" hits "teenagers" but not
//! "nineteenth". A keyword ending in a space must match a whole word.

/// Every genre a book can carry
pub const GENRE_TAXONOMY: [&str; 25] = [
    "Literary Fiction",
    "Science Fiction",
    "Fantasy",
    "Mystery/Thriller",
    "Romance",
    "Horror",
    "Historical Fiction",
    "Contemporary Fiction",
    "Young Adult",
    "Children's",
    "Biography/Memoir",
    "History",
    "Science",
    "Philosophy",
    "Psychology",
    "Self-Help",
    "Business",
    "Poetry",
    "Art/Design",
    "Travel",
    "Religion/Spirituality",
    "Politics",
    "True Crime",
    "Humor",
    shelf_common::DEFAULT_GENRE,
];

/// Ordered `(keyword, genre)` table; first hit wins
const GENRE_KEYWORDS: &[(&str, &str)] = &[
    // Fiction sub-genres
    ("science fiction", "Science Fiction"),
    ("sci fi", "Science Fiction"),
    ("scifi", "Science Fiction"),
    ("fantasy", "Fantasy"),
    ("mystery", "Mystery/Thriller"),
    ("mysteries", "Mystery/Thriller"),
    ("thriller", "Mystery/Thriller"),
    ("suspense", "Mystery/Thriller"),
    ("detective", "Mystery/Thriller"),
    ("crime fiction", "Mystery/Thriller"),
    ("romance", "Romance"),
    ("love stories", "Romance"),
    ("horror", "Horror"),
    ("gothic", "Horror"),
    ("historical fiction", "Historical Fiction"),
    ("young adult", "Young Adult"),
    ("ya ", "Young Adult"),
    ("teen", "Young Adult"),
    ("children", "Children's"),
    ("juvenile", "Children's"),
    ("picture book", "Children's"),
    ("literary fiction", "Literary Fiction"),
    ("contemporary fiction", "Contemporary Fiction"),
    ("general fiction", "Contemporary Fiction"),
    ("fiction", "Literary Fiction"),
    // Non-fiction
    ("true crime", "True Crime"),
    ("biography", "Biography/Memoir"),
    ("memoir", "Biography/Memoir"),
    ("autobiography", "Biography/Memoir"),
    ("history", "History"),
    ("historical", "History"),
    ("science", "Science"),
    ("physics", "Science"),
    ("biology", "Science"),
    ("chemistry", "Science"),
    ("mathematics", "Science"),
    ("astronomy", "Science"),
    ("evolution", "Science"),
    ("neuroscience", "Science"),
    ("philosophy", "Philosophy"),
    ("ethics", "Philosophy"),
    ("psychology", "Psychology"),
    ("mental health", "Psychology"),
    ("psychiatry", "Psychology"),
    ("self help", "Self-Help"),
    ("personal development", "Self-Help"),
    ("motivation", "Self-Help"),
    ("productivity", "Self-Help"),
    ("business", "Business"),
    ("economics", "Business"),
    ("management", "Business"),
    ("entrepreneurship", "Business"),
    ("finance", "Business"),
    ("investing", "Business"),
    ("marketing", "Business"),
    ("poetry", "Poetry"),
    ("poems", "Poetry"),
    ("art ", "Art/Design"),
    ("design", "Art/Design"),
    ("photography", "Art/Design"),
    ("architecture", "Art/Design"),
    ("travel", "Travel"),
    ("religion", "Religion/Spirituality"),
    ("spiritual", "Religion/Spirituality"),
    ("theology", "Religion/Spirituality"),
    ("buddhism", "Religion/Spirituality"),
    ("christianity", "Religion/Spirituality"),
    ("islam", "Religion/Spirituality"),
    ("meditation", "Religion/Spirituality"),
    ("politics", "Politics"),
    ("political", "Politics"),
    ("government", "Politics"),
    ("humor", "Humor"),
    ("comedy", "Humor"),
    ("satire", "Humor"),
    ("funny", "Humor"),
];

/// Lowercase, punctuation to spaces, single-spaced, padded on both ends
fn fold(subject: &str) -> String {
    let lowered: String = subject
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { ' ' })
        .collect();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    format!(" {} ", words.join(" "))
}

/// Whether `genre` is one of the taxonomy's exact names
pub fn is_known_genre(genre: &str) -> bool {
    GENRE_TAXONOMY.contains(&genre)
}

/// Genre for a single subject string, if any keyword matches
pub fn classify_subject(subject: &str) -> Option<&'static str> {
    let folded = fold(subject);
    GENRE_KEYWORDS
        .iter()
        .find(|(keyword, _)| folded.contains(&format!(" {}", keyword)))
        .map(|(_, genre)| *genre)
}

/// The book's single genre: the first subject that maps to anything
pub fn primary_genre<S: AsRef<str>>(subjects: &[S]) -> Option<&'static str> {
    subjects
        .iter()
        .find_map(|subject| classify_subject(subject.as_ref()))
}
