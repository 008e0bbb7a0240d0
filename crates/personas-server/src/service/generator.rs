//! Synthetic persona generator.
//!
//! A [`PersonaGenerator`] is built once from configuration and injected through
//! application state. With a seed its output is fully deterministic.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use parking_lot::Mutex;
use personas_common::{
    MAX_SYNTHETIC_AGE, MIN_SYNTHETIC_AGE, PersonaError, SYNTHETIC_EMAIL_DOMAINS,
};
use personas_persistence::NewPersona;
use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::{Rng, SeedableRng};

/// Name draws attempted before a numeric discriminator is appended to an email.
const MAX_EMAIL_ATTEMPTS: usize = 16;

const NOTE_WORDS: usize = 6;

/// Locale of the generated names, phones and notes
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    EsEs,
    EnUs,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::EsEs => "es_ES",
            Locale::EnUs => "en_US",
        }
    }

    fn data(&self) -> &'static LocaleData {
        match self {
            Locale::EsEs => &ES_ES,
            Locale::EnUs => &EN_US,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = PersonaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").to_ascii_lowercase().as_str() {
            "es" | "es_es" => Ok(Locale::EsEs),
            "en" | "en_us" => Ok(Locale::EnUs),
            _ => Err(PersonaError::IllegalArgument(format!(
                "unsupported generator locale '{}'",
                s
            ))),
        }
    }
}

struct LocaleData {
    first_names: &'static [&'static str],
    last_names: &'static [&'static str],
    /// `#` is replaced by a random digit
    phone_formats: &'static [&'static str],
    words: &'static [&'static str],
}

static ES_ES: LocaleData = LocaleData {
    first_names: &[
        "Alejandro", "Ana", "Andrés", "Beatriz", "Carlos", "Carmen", "Diego", "Elena", "Fernando",
        "Francisco", "Isabel", "Javier", "Jorge", "José", "Laura", "Lucía", "Luis", "Manuel",
        "María", "Marta", "Miguel", "Nuria", "Pablo", "Paula", "Pedro", "Pilar", "Raquel",
        "Rocío", "Sergio", "Sofía", "Teresa", "Víctor",
    ],
    last_names: &[
        "Alonso", "Blanco", "Castillo", "Castro", "Delgado", "Díaz", "Domínguez", "Fernández",
        "García", "Gil", "Gómez", "González", "Gutiérrez", "Hernández", "Jiménez", "López",
        "Martín", "Martínez", "Molina", "Moreno", "Muñoz", "Navarro", "Ortega", "Pérez",
        "Ramírez", "Romero", "Rubio", "Ruiz", "Sánchez", "Serrano", "Torres", "Vázquez",
    ],
    phone_formats: &[
        "+34 6## ### ###",
        "+34 7## ## ## ##",
        "+34 9## ### ###",
        "6########",
        "9## ## ## ##",
    ],
    words: &[
        "acuerdo", "ahora", "algo", "ciudad", "claro", "cosa", "decir", "después", "día",
        "donde", "forma", "gente", "grande", "hacer", "mismo", "momento", "mundo", "nuevo",
        "parte", "poder", "pueblo", "siempre", "tiempo", "trabajo", "vida", "viaje",
    ],
};

static EN_US: LocaleData = LocaleData {
    first_names: &[
        "Amanda", "Andrew", "Ashley", "Brian", "Christopher", "Daniel", "David", "Elizabeth",
        "Emily", "Jacob", "James", "Jennifer", "Jessica", "John", "Joseph", "Joshua", "Karen",
        "Linda", "Matthew", "Michael", "Nancy", "Patricia", "Robert", "Sarah", "Susan", "Thomas",
        "William",
    ],
    last_names: &[
        "Anderson", "Brown", "Clark", "Davis", "Garcia", "Harris", "Jackson", "Johnson", "Jones",
        "Lewis", "Martin", "Martinez", "Miller", "Moore", "Robinson", "Rodriguez", "Smith",
        "Taylor", "Thomas", "Thompson", "Walker", "White", "Williams", "Wilson", "Young",
    ],
    phone_formats: &[
        "(###) ###-####",
        "###-###-####",
        "###.###.####",
        "+1-###-###-####",
    ],
    words: &[
        "about", "around", "build", "change", "city", "country", "early", "family", "friend",
        "house", "idea", "letter", "little", "morning", "never", "number", "people", "place",
        "project", "question", "story", "travel", "water", "world", "young",
    ],
};

/// Generates synthetic personas
pub struct PersonaGenerator {
    locale: Locale,
    rng: Mutex<StdRng>,
}

impl PersonaGenerator {
    pub fn new(locale: Locale, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            locale,
            rng: Mutex::new(rng),
        }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Generates `count` personas whose ages fall in the synthetic range on `today`.
    ///
    /// Emails are unique within the batch and never collide with `taken`.
    pub fn generate(
        &self,
        count: usize,
        today: NaiveDate,
        taken: &HashSet<String>,
    ) -> Vec<NewPersona> {
        let data = self.locale.data();
        let (earliest, latest) = birth_date_bounds(today);
        let span_days = (latest - earliest).num_days().max(0) as u64;

        let mut rng = self.rng.lock();
        let mut issued: HashSet<String> = HashSet::with_capacity(count);
        let mut personas = Vec::with_capacity(count);

        for _ in 0..count {
            let (first_name, last_name, email) =
                unique_identity(&mut *rng, data, taken, &issued);
            issued.insert(email.clone());

            let birth_date = earliest
                .checked_add_days(Days::new(rng.random_range(0..=span_days)))
                .unwrap_or(latest);

            personas.push(NewPersona {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email,
                phone: Some(phone_number(&mut *rng, data)),
                birth_date: Some(birth_date),
                is_active: rng.random_bool(0.5),
                notes: if rng.random_bool(0.5) {
                    Some(sentence(&mut *rng, data, NOTE_WORDS))
                } else {
                    None
                },
            });
        }

        personas
    }
}

/// Oldest and youngest birth date that still yields an age in the synthetic range.
pub fn birth_date_bounds(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let latest = today
        .checked_sub_months(Months::new(MIN_SYNTHETIC_AGE * 12))
        .unwrap_or(today);
    let earliest = today
        .checked_sub_months(Months::new((MAX_SYNTHETIC_AGE + 1) * 12))
        .and_then(|d| d.checked_add_days(Days::new(1)))
        .unwrap_or(latest);
    (earliest, latest)
}

fn unique_identity<R: Rng>(
    rng: &mut R,
    data: &LocaleData,
    taken: &HashSet<String>,
    issued: &HashSet<String>,
) -> (&'static str, &'static str, String) {
    let is_free = |email: &str| !taken.contains(email) && !issued.contains(email);

    let mut last_draw = None;
    for _ in 0..MAX_EMAIL_ATTEMPTS {
        let first = pick(rng, data.first_names);
        let last = pick(rng, data.last_names);
        let domain = pick(rng, &SYNTHETIC_EMAIL_DOMAINS);
        let email = synthetic_email(first, last, domain, None);
        if is_free(&email) {
            return (first, last, email);
        }
        last_draw = Some((first, last, domain));
    }

    let (first, last, domain) = last_draw.unwrap_or((
        data.first_names[0],
        data.last_names[0],
        SYNTHETIC_EMAIL_DOMAINS[0],
    ));
    let mut discriminator: u64 = 1;
    loop {
        let email = synthetic_email(first, last, domain, Some(discriminator));
        if is_free(&email) {
            return (first, last, email);
        }
        discriminator += 1;
    }
}

fn pick<R: Rng>(rng: &mut R, values: &'static [&'static str]) -> &'static str {
    values.choose(rng).copied().unwrap_or_default()
}

/// Builds `first.last[N]@domain`, lower-cased and reduced to ASCII letters and digits.
pub fn synthetic_email(first: &str, last: &str, domain: &str, discriminator: Option<u64>) -> String {
    let mut local = format!("{}.{}", email_token(first), email_token(last));
    if let Some(n) = discriminator {
        local.push_str(&n.to_string());
    }
    format!("{}@{}", local, domain)
}

fn email_token(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            'á' | 'à' | 'ä' | 'â' => Some('a'),
            'é' | 'è' | 'ë' | 'ê' => Some('e'),
            'í' | 'ì' | 'ï' | 'î' => Some('i'),
            'ó' | 'ò' | 'ö' | 'ô' => Some('o'),
            'ú' | 'ù' | 'ü' | 'û' => Some('u'),
            'ñ' => Some('n'),
            'ç' => Some('c'),
            c if c.is_ascii_alphanumeric() => Some(c),
            _ => None,
        })
        .collect()
}

fn phone_number<R: Rng>(rng: &mut R, data: &LocaleData) -> String {
    pick(rng, data.phone_formats)
        .chars()
        .map(|c| {
            if c == '#' {
                char::from(b'0' + rng.random_range(0..10u8))
            } else {
                c
            }
        })
        .collect()
}

fn sentence<R: Rng>(rng: &mut R, data: &LocaleData, words: usize) -> String {
    let mut text = (0..words)
        .map(|_| pick(rng, data.words))
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(first) = text.get(..1) {
        let upper = first.to_uppercase();
        text.replace_range(..1, &upper);
    }
    text.push('.');
    text
}
