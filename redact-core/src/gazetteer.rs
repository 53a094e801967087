//! # Gazetteers — Listas de Entidades Conhecidas
//!
//! Cada idioma traz uma lista embutida de prenomes/sobrenomes e de lugares.
//! As entradas são guardadas já tokenizadas e em minúsculas (ex: "Tel Aviv" →
//! `["tel", "aviv"]`), ordenadas da frase mais longa para a mais curta, para que
//! "New York City" vença "New York".
//!
//! As listas podem ser estendidas em tempo de execução (arquivo de
//! configuração da CLI) com [`Gazetteer::add_person`] e [`Gazetteer::add_location`].

use serde::{Deserialize, Serialize};

use crate::locale::Language;
use crate::tokenizer::tokenize;

const ENGLISH_PERSONS: &[&str] = &[
    "james", "john", "robert", "michael", "william", "david", "richard", "joseph",
    "thomas", "charles", "daniel", "matthew", "anthony", "steven", "andrew",
    "joshua", "kevin", "brian", "george", "edward", "peter", "simon", "oliver",
    "harry", "jack", "noah", "liam", "bob", "mary", "patricia", "jennifer",
    "linda", "elizabeth", "barbara", "susan", "jessica", "sarah", "karen",
    "alice", "emma", "olivia", "sophia", "anna", "emily", "laura", "rachel",
    "rebecca", "hannah", "charlotte", "amelia", "smith", "johnson", "williams",
    "brown", "jones", "miller", "davis", "wilson", "taylor", "anderson",
];

const ENGLISH_LOCATIONS: &[&str] = &[
    "united states", "united kingdom", "england", "scotland", "ireland", "wales",
    "france", "germany", "spain", "italy", "portugal", "canada", "mexico",
    "brazil", "argentina", "china", "japan", "india", "israel", "australia",
    "russia", "egypt", "europe", "africa", "asia", "london", "paris", "berlin",
    "madrid", "rome", "lisbon", "vienna", "prague", "amsterdam", "dublin",
    "moscow", "new york", "new york city", "los angeles", "chicago", "boston",
    "san francisco", "washington", "toronto", "sydney", "tokyo", "jerusalem",
    "tel aviv", "haifa", "california", "texas", "florida", "new jersey",
];

const HEBREW_PERSONS: &[&str] = &[
    "דוד", "משה", "יוסף", "אברהם", "יצחק", "יעקב", "שמואל", "אליהו", "דניאל",
    "יונתן", "אורי", "איתי", "נועם", "עומר", "רון", "שרה", "רחל", "לאה", "רבקה",
    "מרים", "נועה", "תמר", "יעל", "מיכל", "שירה", "אביגיל", "חנה", "אסתר",
    "רות", "עדי", "כהן", "לוי", "מזרחי", "פרץ", "ביטון", "אברהמי", "פרידמן",
];

const HEBREW_LOCATIONS: &[&str] = &[
    "ישראל", "ירושלים", "תל אביב", "חיפה", "באר שבע", "אילת", "נתניה",
    "הרצליה", "רמת גן", "פתח תקווה", "אשדוד", "אשקלון", "טבריה", "צפת", "עכו",
    "נצרת", "רחובות", "ראשון לציון", "חולון", "בת ים", "מצרים", "ירדן", "לבנון",
    "סוריה", "ארצות הברית", "צרפת", "גרמניה", "אנגליה", "לונדון", "פריז",
    "ניו יורק", "אירופה",
];

/// Frases de pessoas e lugares, tokenizadas e em minúsculas.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gazetteer {
    persons: Vec<Vec<String>>,
    locations: Vec<Vec<String>>,
}

impl Gazetteer {
    /// Gazetteer vazio.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gazetteer embutido de um idioma.
    pub fn for_language(language: Language) -> Self {
        let (persons, locations) = match language {
            Language::English => (ENGLISH_PERSONS, ENGLISH_LOCATIONS),
            Language::Hebrew => (HEBREW_PERSONS, HEBREW_LOCATIONS),
        };
        let mut gazetteer = Self::new();
        for name in persons {
            gazetteer.add_person(name);
        }
        for name in locations {
            gazetteer.add_location(name);
        }
        gazetteer
    }

    pub fn add_person(&mut self, name: &str) {
        insert_phrase(&mut self.persons, name);
    }

    pub fn add_location(&mut self, name: &str) {
        insert_phrase(&mut self.locations, name);
    }

    /// Frases de pessoas, da mais longa para a mais curta
    pub fn persons(&self) -> &[Vec<String>] {
        &self.persons
    }

    /// Frases de lugares, da mais longa para a mais curta
    pub fn locations(&self) -> &[Vec<String>] {
        &self.locations
    }
}

fn insert_phrase(list: &mut Vec<Vec<String>>, name: &str) {
    let parts: Vec<String> = tokenize(name).iter().map(|t| t.lower()).collect();
    if parts.is_empty() || list.contains(&parts) {
        return;
    }
    list.push(parts);
    // sort_by é estável: frases de mesmo tamanho mantêm a ordem de inserção
    list.sort_by(|a, b| b.len().cmp(&a.len()));
}
