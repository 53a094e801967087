//! # Motor de Regras — Gazetteers e Padrões Regex
//!
//! O detector embutido não usa modelo estatístico: ele combina padrões de
//! data (regex), títulos que antecedem nomes ("Dr.", `ד"ר`), gazetteers de
//! pessoas e lugares e sufixos de organização ("Inc", `בע"מ`).
//!
//! ## Precedência
//!
//! As regras rodam nesta ordem, e um token marcado por uma regra não é
//! reavaliado pelas seguintes:
//!
//! 1. Datas (regex sobre o texto bruto)
//! 2. Títulos → pessoa
//! 3. Sufixos de organização → organização
//! 4. Gazetteer de pessoas (estendido por sobrenomes capitalizados)
//! 5. Gazetteer de lugares
//!
//! ## Escritas sem caixa
//!
//! Em inglês, nomes precisam começar com maiúscula. Hebraico não tem caixa;
//! em compensação, um proclítico de uma letra (`ב`, `ל`, `מ`, `ה`, `ו`, `כ`, `ש`)
//! pode vir colado ao nome ("בירושלים"). O span gerado exclui o proclítico.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::gazetteer::Gazetteer;
use crate::locale::Language;
use crate::tagger::{EntityCategory, Tag};
use crate::tokenizer::Token;

/// Uma correspondência de regra: qual token foi marcado e com qual tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleMatch {
    pub token_index: usize,
    pub tag: Tag,
    pub rule_name: String,
    /// Bytes iniciais do token que ficam fora da entidade (proclítico)
    pub skip: usize,
}

const ENGLISH_MONTHS: &str = "(?:Jan(?:uary)?|Feb(?:ruary)?|Mar(?:ch)?|Apr(?:il)?|May|June?|July?|Aug(?:ust)?|Sep(?:t(?:ember)?)?|Oct(?:ober)?|Nov(?:ember)?|Dec(?:ember)?)";

const HEBREW_MONTHS: &str =
    "(?:ינואר|פברואר|מרץ|מרס|אפריל|מאי|יוני|יולי|אוגוסט|ספטמבר|אוקטובר|נובמבר|דצמבר)";

const NUMERIC_DATE: &str = r"\b\d{1,2}[./-]\d{1,2}[./-](?:\d{4}|\d{2})\b";
const ISO_DATE: &str = r"\b\d{4}-\d{2}-\d{2}\b";

const ENGLISH_TITLES: &[&str] = &[
    "mr", "mrs", "ms", "miss", "mister", "dr", "doctor", "prof", "professor",
    "sir", "madam", "dame", "lord", "lady", "judge", "rev", "sen", "gov",
];

const HEBREW_TITLES: &[&str] = &[
    "מר", "גב'", "גב׳", "גברת", "ד\"ר", "ד״ר", "פרופ'", "פרופ׳", "פרופסור",
    "עו\"ד", "עו״ד", "הרב", "רב",
];

const ENGLISH_ORG_SUFFIXES: &[&str] = &["inc", "ltd", "llc", "corp", "plc", "gmbh", "co"];
const HEBREW_ORG_SUFFIXES: &[&str] = &["בע\"מ", "בע״מ"];

const HEBREW_PROCLITICS: &[char] = &['ב', 'ל', 'מ', 'ה', 'ו', 'כ', 'ש'];

/// Quantos tokens capitalizados um sufixo de organização absorve para trás.
const MAX_ORG_WORDS: usize = 3;

/// Motor de regras com gazetteers e padrões regex
pub struct RuleEngine {
    gazetteer: Gazetteer,
    date_patterns: &'static [(&'static str, Regex)],
    person_titles: Vec<String>,
    org_suffixes: Vec<String>,
    proclitics: &'static [char],
    /// Se `true`, nomes precisam começar com maiúscula
    cased: bool,
}

impl RuleEngine {
    /// Motor de regras de um idioma com seu gazetteer embutido.
    pub fn for_language(language: Language) -> Self {
        Self::with_gazetteer(language, Gazetteer::for_language(language))
    }

    pub fn with_gazetteer(language: Language, gazetteer: Gazetteer) -> Self {
        let (titles, suffixes, proclitics, cased): (&[&str], &[&str], &'static [char], bool) =
            match language {
                Language::English => (ENGLISH_TITLES, ENGLISH_ORG_SUFFIXES, &[], true),
                Language::Hebrew => (HEBREW_TITLES, HEBREW_ORG_SUFFIXES, HEBREW_PROCLITICS, false),
            };

        Self {
            gazetteer,
            date_patterns: date_patterns(language),
            person_titles: titles.iter().map(|s| s.to_string()).collect(),
            org_suffixes: suffixes.iter().map(|s| s.to_string()).collect(),
            proclitics,
            cased,
        }
    }

    /// Aplica todas as regras à sequência de tokens de `text`
    ///
    /// Retorna, por token, a regra que o marcou (ou `None`).
    pub fn apply(&self, text: &str, tokens: &[Token]) -> Vec<Option<RuleMatch>> {
        let mut result: Vec<Option<RuleMatch>> = vec![None; tokens.len()];

        // 1. Datas: a regex roda no texto bruto; os tokens contidos no match são marcados
        for (rule_name, pattern) in self.date_patterns {
            for m in pattern.find_iter(text) {
                let covered: Vec<usize> = tokens
                    .iter()
                    .filter(|t| t.start >= m.start() && t.end <= m.end())
                    .map(|t| t.index)
                    .collect();
                if covered.is_empty() || covered.iter().any(|&i| result[i].is_some()) {
                    continue;
                }
                mark(&mut result, &covered, EntityCategory::Date, rule_name, 0);
            }
        }

        // 2. Título: "Dr. Smith" → Smith é pessoa
        for i in 0..tokens.len() {
            if !self.person_titles.contains(&tokens[i].lower()) {
                continue;
            }
            let mut j = i + 1;
            if tokens.get(j).map(|t| t.text == ".").unwrap_or(false) {
                j += 1;
            }
            let name = self.name_run(tokens, j, &result);
            if !name.is_empty() {
                mark(&mut result, &name, EntityCategory::Person, "title_pattern", 0);
            }
        }

        // 3. Sufixos: "Acme Inc" → Acme Inc é organização
        for i in 1..tokens.len() {
            if result[i].is_some() || !self.org_suffixes.contains(&tokens[i].lower()) {
                continue;
            }
            let mut first = i;
            while first > 0
                && i - first < MAX_ORG_WORDS
                && result[first - 1].is_none()
                && self.is_name_like(&tokens[first - 1])
            {
                first -= 1;
                if !self.cased {
                    break;
                }
            }
            if first < i {
                let covered: Vec<usize> = (first..=i).collect();
                mark(&mut result, &covered, EntityCategory::Organization, "org_suffix_pattern", 0);
            }
        }

        // 4. Gazetteer de pessoas, colando nomes consecutivos ("David Smith")
        let mut i = 0;
        while i < tokens.len() {
            let Some((len, skip)) = self.match_any(tokens, i, self.gazetteer.persons(), &result) else {
                i += 1;
                continue;
            };
            let mut covered: Vec<usize> = (i..i + len).collect();
            if self.cased {
                let surname = self.name_run(tokens, i + len, &result);
                covered.extend(surname);
            }
            let continues = skip == 0
                && i > 0
                && result[i - 1].as_ref().and_then(|r| r.tag.category()) == Some(EntityCategory::Person);
            if continues {
                for &k in &covered {
                    result[k] = Some(RuleMatch {
                        token_index: k,
                        tag: Tag::Inside(EntityCategory::Person),
                        rule_name: "person_gazetteer".to_string(),
                        skip: 0,
                    });
                }
            } else {
                mark(&mut result, &covered, EntityCategory::Person, "person_gazetteer", skip);
            }
            i += covered.len();
        }

        // 5. Gazetteer de lugares
        let mut i = 0;
        while i < tokens.len() {
            match self.match_any(tokens, i, self.gazetteer.locations(), &result) {
                Some((len, skip)) => {
                    let covered: Vec<usize> = (i..i + len).collect();
                    mark(&mut result, &covered, EntityCategory::Location, "location_gazetteer", skip);
                    i += len;
                }
                None => i += 1,
            }
        }

        result
    }

    /// Tokens de nome a partir de `start`, ainda não marcados.
    ///
    /// Com caixa: a sequência de palavras capitalizadas. Sem caixa: uma palavra.
    fn name_run(&self, tokens: &[Token], start: usize, result: &[Option<RuleMatch>]) -> Vec<usize> {
        let mut run = Vec::new();
        let mut j = start;
        while j < tokens.len() && result[j].is_none() && self.is_name_like(&tokens[j]) {
            run.push(j);
            j += 1;
            if !self.cased {
                break;
            }
        }
        run
    }

    fn is_name_like(&self, token: &Token) -> bool {
        token.is_word() && (!self.cased || token.is_capitalized())
    }

    /// Primeira (e mais longa) frase que casa em `i`: `(tamanho, skip)`.
    fn match_any(
        &self,
        tokens: &[Token],
        i: usize,
        phrases: &[Vec<String>],
        result: &[Option<RuleMatch>],
    ) -> Option<(usize, usize)> {
        phrases.iter().find_map(|phrase| {
            let end = i + phrase.len();
            if end > tokens.len() || result[i..end].iter().any(Option::is_some) {
                return None;
            }
            self.match_phrase(&tokens[i..end], phrase).map(|skip| (phrase.len(), skip))
        })
    }

    /// Compara `tokens` com `phrase`; retorna os bytes de proclítico do primeiro token.
    fn match_phrase(&self, tokens: &[Token], phrase: &[String]) -> Option<usize> {
        if self.cased && tokens.iter().any(|t| t.is_word() && !t.is_capitalized()) {
            return None;
        }
        if tokens[1..]
            .iter()
            .zip(&phrase[1..])
            .any(|(token, part)| token.lower() != *part)
        {
            return None;
        }

        let first = &tokens[0];
        if first.lower() == phrase[0] {
            return Some(0);
        }
        let mut chars = first.text.chars();
        let prefix = chars.next()?;
        let rest = chars.as_str();
        if self.proclitics.contains(&prefix) && rest.chars().count() > 1 && rest.to_lowercase() == phrase[0] {
            return Some(prefix.len_utf8());
        }
        None
    }
}

/// Marca `covered` como uma entidade `B-cat I-cat ...`.
fn mark(
    result: &mut [Option<RuleMatch>],
    covered: &[usize],
    category: EntityCategory,
    rule_name: &str,
    skip: usize,
) {
    for (n, &k) in covered.iter().enumerate() {
        result[k] = Some(RuleMatch {
            token_index: k,
            tag: if n == 0 { Tag::Begin(category) } else { Tag::Inside(category) },
            rule_name: rule_name.to_string(),
            skip: if n == 0 { skip } else { 0 },
        });
    }
}

type DatePatterns = Vec<(&'static str, Regex)>;

// Padrões fixos: falhar aqui é erro de programação, coberto pelos testes
static ENGLISH_DATES: LazyLock<DatePatterns> = LazyLock::new(|| {
    vec![
        (
            "month_day_year",
            Regex::new(&format!(
                r"\b{m}\.?\s+\d{{1,2}}(?:st|nd|rd|th)?(?:,?\s+\d{{4}})?\b",
                m = ENGLISH_MONTHS
            ))
            .expect("static regex: month_day_year"),
        ),
        (
            "day_month_year",
            Regex::new(&format!(
                r"\b\d{{1,2}}(?:st|nd|rd|th)?\s+(?:of\s+)?{m}\.?(?:,?\s+\d{{4}})?\b",
                m = ENGLISH_MONTHS
            ))
            .expect("static regex: day_month_year"),
        ),
        (
            "month_year",
            Regex::new(&format!(r"\b{m}\s+\d{{4}}\b", m = ENGLISH_MONTHS))
                .expect("static regex: month_year"),
        ),
        ("iso_date", Regex::new(ISO_DATE).expect("static regex: iso_date")),
        ("numeric_date", Regex::new(NUMERIC_DATE).expect("static regex: numeric_date")),
    ]
});

static HEBREW_DATES: LazyLock<DatePatterns> = LazyLock::new(|| {
    vec![
        (
            "day_month_year",
            Regex::new(&format!(
                r"\b\d{{1,2}}\s+[בל]?-?{m}(?:\s+\d{{4}})?\b",
                m = HEBREW_MONTHS
            ))
            .expect("static regex: hebrew day_month_year"),
        ),
        (
            "month_year",
            Regex::new(&format!(r"\b[בל]?{m}\s+\d{{4}}\b", m = HEBREW_MONTHS))
                .expect("static regex: hebrew month_year"),
        ),
        ("iso_date", Regex::new(ISO_DATE).expect("static regex: iso_date")),
        ("numeric_date", Regex::new(NUMERIC_DATE).expect("static regex: numeric_date")),
    ]
});

/// Padrões de data do idioma, do mais específico para o mais genérico.
fn date_patterns(language: Language) -> &'static [(&'static str, Regex)] {
    match language {
        Language::English => &ENGLISH_DATES,
        Language::Hebrew => &HEBREW_DATES,
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::for_language(Language::English)
    }
}
