//! Locale tables
//!
//! Every user-visible string and the model instruction template are looked up
//! through [`Locale`]. The set of locales is closed: anything that is not
//! recognised as Croatian falls back to US English.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported UI locales
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Option<String>")]
pub enum Locale {
    #[default]
    #[serde(rename = "en-us")]
    EnUs,
    #[serde(rename = "hr")]
    Hr,
}

impl Locale {
    /// Parse a locale tag. `hr` and `hr-*` (any case) select Croatian,
    /// everything else selects English.
    pub fn parse(tag: &str) -> Self {
        let tag = tag.trim().to_ascii_lowercase();
        if tag == "hr" || tag.starts_with("hr-") || tag.starts_with("hr_") {
            Locale::Hr
        } else {
            Locale::EnUs
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-us",
            Locale::Hr => "hr",
        }
    }

    /// Synthetic assistant message shown when a session starts
    pub fn greeting(&self) -> &'static str {
        match self {
            Locale::EnUs => "Hi, what would you like to learn about NSoft Vision?",
            Locale::Hr => "Pozdrav, što biste željeli naučiti o NSoft Visionu?",
        }
    }

    /// Input placeholder while a request is in flight
    pub fn typing_indicator(&self) -> &'static str {
        match self {
            Locale::EnUs => "Assistant is typing...",
            Locale::Hr => "Asistent tipka...",
        }
    }

    /// Input placeholder while idle
    pub fn input_placeholder(&self) -> &'static str {
        match self {
            Locale::EnUs => "Any question about Vision? Type it here...",
            Locale::Hr => "Imate pitanje o Visionu? Upitajte ovdje...",
        }
    }

    /// Warning shown when an empty question is submitted
    pub fn empty_question_warning(&self) -> &'static str {
        match self {
            Locale::EnUs => "Please input a question",
            Locale::Hr => "Molimo unesite pitanje",
        }
    }

    /// Heading rendered above the transcript
    pub fn title(&self) -> &'static str {
        match self {
            Locale::EnUs => "NSoft Vision Customer Support Assistant",
            Locale::Hr => "NSoft Vision korisnički asistent za podršku",
        }
    }

    /// Model instructions placed at the top of the system prompt
    pub fn instructions(&self) -> &'static str {
        match self {
            Locale::EnUs => EN_US_INSTRUCTIONS,
            Locale::Hr => HR_INSTRUCTIONS,
        }
    }

    /// Suggested prompts offered in the carousel
    pub fn suggested_prompts(&self) -> &'static [&'static str] {
        match self {
            Locale::EnUs => EN_US_SUGGESTIONS,
            Locale::Hr => HR_SUGGESTIONS,
        }
    }
}

impl From<&str> for Locale {
    fn from(tag: &str) -> Self {
        Locale::parse(tag)
    }
}

impl From<Option<String>> for Locale {
    fn from(tag: Option<String>) -> Self {
        tag.as_deref().map(Locale::parse).unwrap_or_default()
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const EN_US_INSTRUCTIONS: &str = "You are an NSoft Vision customer support agent with a friendly and \
conversational tone. Given the following extracted parts of a long document and a question, provide a \
conversational answer based on your training and the context provided. Feel free to engage in small talk \
or answer questions about yourself, like a human would. The preferred Markdown syntax for a hyperlink is \
square brackets followed by parentheses - the square brackets hold the text, and the parentheses hold the \
link. Please try to reference the context below when providing hyperlinks, and refrain from creating \
random or irrelevant links. If the answer to the question isn't clear from the context provided, it's \
perfectly okay to say, \"Based on the information I have, I couldn't find a direct answer. I would \
recommend searching the Help Center for more detailed information.\"";

const HR_INSTRUCTIONS: &str = "Vi ste agentica za korisničku podršku NSoft Vision. Dobivate sljedeće \
izvučene dijelove dugog dokumenta i pitanje. Dajte razgovorljiv odgovor temeljen na svojoj obuci i \
pruženom kontekstu, ali i sudjelujte u neformalnom razgovoru ili odgovarajte na pitanja o sebi, kao što \
bi to čovjek učinio, posebno na početku razgovora ukoliko vam se sugovornik obrati sa \"Cao\" ili \"Bok\", \
itd.\nPreferirana Markdown sintaksa za hipervezu su uglate zagrade koje slijede obične zagrade. Uglate \
zagrade sadrže tekst, a obične zagrade sadrže vezu. Pokušajte pružiti hiperveze koje se odnose na \
kontekst u nastavku i suzdržite se od stvaranja nasumičnih ili nevažnih veza. Odgovori neka budu kratki \
tako da navedete samo hiperveze do konteksta ispod. Ne pokušavajte izmisliti odgovor.\nAko odgovor na \
pitanje nije jasan iz pruženog konteksta, u redu je reći, \"Na temelju informacija koje imam, nisam mogla \
pronaći izravan odgovor. Preporučila bih pretraživanje Centra za pomoć za detaljnije informacije.\"";

const EN_US_SUGGESTIONS: &[&str] = &[
    "What is Vision?",
    "How do I create a new user?",
    "How do I reset my password?",
    "Where can I find the Help Center?",
    "How do I export a report?",
    "How do I set up notifications?",
    "Which browsers are supported?",
    "How do I change the interface language?",
    "How do I assign roles and permissions?",
    "Who do I contact for support?",
];

const HR_SUGGESTIONS: &[&str] = &[
    "Što je Vision?",
    "Kako dodati novog korisnika?",
    "Kako resetirati lozinku?",
    "Gdje mogu pronaći Centar za pomoć?",
    "Kako izvesti izvještaj?",
    "Kako postaviti obavijesti?",
    "Koji su preglednici podržani?",
    "Kako promijeniti jezik sučelja?",
    "Kako dodijeliti uloge i dozvole?",
    "Koga kontaktirati za podršku?",
];
