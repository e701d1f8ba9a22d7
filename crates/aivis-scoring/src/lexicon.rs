//! Word tables for the sentiment analyzer.

/// Word valences on the conventional `[-4.0, 4.0]` scale.
///
/// Keys are lowercase single words. The analyzer normalizes the summed
/// valence into `[-1.0, 1.0]`, so absolute magnitudes only matter relative to
/// each other.
pub(crate) const LEXICON: &[(&str, f64)] = &[
    // Positive signals
    ("good", 1.9),
    ("great", 3.1),
    ("excellent", 2.7),
    ("outstanding", 3.0),
    ("amazing", 2.8),
    ("awesome", 3.1),
    ("fantastic", 2.6),
    ("best", 3.2),
    ("better", 1.9),
    ("love", 3.2),
    ("loved", 2.9),
    ("like", 1.5),
    ("liked", 1.8),
    ("recommend", 1.5),
    ("recommended", 1.8),
    ("trusted", 2.1),
    ("trust", 2.3),
    ("reliable", 1.9),
    ("popular", 1.8),
    ("leading", 1.4),
    ("leader", 1.7),
    ("innovative", 1.9),
    ("powerful", 1.8),
    ("easy", 1.9),
    ("intuitive", 1.6),
    ("helpful", 1.8),
    ("useful", 1.9),
    ("effective", 2.1),
    ("efficient", 1.8),
    ("affordable", 1.6),
    ("valuable", 2.1),
    ("impressive", 2.5),
    ("robust", 1.6),
    ("secure", 1.4),
    ("safe", 1.9),
    ("fast", 1.3),
    ("quality", 1.6),
    ("favorite", 2.0),
    ("solid", 1.2),
    ("strong", 2.3),
    ("superior", 2.5),
    ("top", 0.8),
    ("happy", 2.7),
    ("satisfied", 1.8),
    ("praised", 2.2),
    ("success", 2.7),
    ("successful", 2.8),
    ("win", 2.8),
    ("winner", 2.8),
    ("benefit", 2.0),
    ("benefits", 1.6),
    ("improved", 2.1),
    ("improve", 1.9),
    ("perfect", 2.7),
    ("wonderful", 2.7),
    ("nice", 1.8),
    ("positive", 2.3),
    ("well", 1.1),
    ("clean", 1.7),
    ("seamless", 1.7),
    ("flexible", 1.3),
    ("comprehensive", 1.4),
    ("accurate", 1.6),
    // Negative signals
    ("bad", -2.5),
    ("worse", -2.1),
    ("worst", -3.1),
    ("poor", -2.1),
    ("terrible", -2.1),
    ("awful", -2.0),
    ("horrible", -2.5),
    ("hate", -2.7),
    ("hated", -3.2),
    ("dislike", -1.6),
    ("disappointing", -2.2),
    ("disappointed", -1.9),
    ("frustrating", -1.9),
    ("annoying", -1.7),
    ("broken", -1.9),
    ("buggy", -1.6),
    ("bug", -1.4),
    ("bugs", -1.4),
    ("slow", -1.2),
    ("expensive", -0.9),
    ("overpriced", -1.8),
    ("complicated", -1.2),
    ("confusing", -1.3),
    ("difficult", -1.5),
    ("unreliable", -1.9),
    ("insecure", -1.6),
    ("unsafe", -2.0),
    ("dangerous", -2.1),
    ("risk", -1.1),
    ("risky", -1.4),
    ("problem", -1.7),
    ("problems", -1.7),
    ("issue", -0.9),
    ("issues", -0.9),
    ("concern", -1.2),
    ("concerns", -1.2),
    ("complaint", -1.6),
    ("complaints", -1.6),
    ("fail", -2.5),
    ("failed", -2.3),
    ("failure", -2.3),
    ("lawsuit", -1.7),
    ("scam", -2.8),
    ("fraud", -2.8),
    ("breach", -1.9),
    ("outage", -1.8),
    ("lacking", -1.4),
    ("limited", -0.9),
    ("weak", -1.9),
    ("negative", -2.7),
    ("avoid", -1.2),
    ("useless", -1.8),
    ("outdated", -1.2),
    ("criticized", -1.8),
    ("recall", -1.5),
    ("banned", -2.0),
    ("wrong", -2.1),
    ("sad", -2.1),
    ("angry", -2.3),
];

/// Intensifiers (positive) and dampeners (negative) that scale the next
/// lexicon word.
pub(crate) const BOOSTERS: &[(&str, f64)] = &[
    ("absolutely", 0.293),
    ("completely", 0.293),
    ("considerably", 0.293),
    ("deeply", 0.293),
    ("enormously", 0.293),
    ("especially", 0.293),
    ("exceptionally", 0.293),
    ("extremely", 0.293),
    ("highly", 0.293),
    ("hugely", 0.293),
    ("incredibly", 0.293),
    ("most", 0.293),
    ("particularly", 0.293),
    ("really", 0.293),
    ("remarkably", 0.293),
    ("so", 0.293),
    ("substantially", 0.293),
    ("totally", 0.293),
    ("truly", 0.293),
    ("very", 0.293),
    ("almost", -0.293),
    ("barely", -0.293),
    ("hardly", -0.293),
    ("marginally", -0.293),
    ("occasionally", -0.293),
    ("partly", -0.293),
    ("scarcely", -0.293),
    ("slightly", -0.293),
    ("somewhat", -0.293),
    ("sort", -0.293),
];

pub(crate) const NEGATIONS: &[&str] = &[
    "aint", "arent", "cannot", "cant", "couldnt", "darent", "didnt", "doesnt", "dont", "hadnt",
    "hasnt", "havent", "isnt", "mightnt", "mustnt", "neither", "never", "no", "nobody", "none",
    "nope", "nor", "not", "nothing", "nowhere", "shouldnt", "wasnt", "werent", "without",
    "wont", "wouldnt",
];
