// Flag codes shown next to the economy names in the selection control.

/// Economy display name to two-letter flag asset code. Economies without
/// an entry display as a plain label.
static COUNTRY_CODES: &[(&str, &str)] = &[
    ("Argentina", "ar"),
    ("Australia", "au"),
    ("Austria", "at"),
    ("Belgium", "be"),
    ("Brazil", "br"),
    ("Bulgaria", "bg"),
    ("Canada", "ca"),
    ("Chile", "cl"),
    ("Colombia", "co"),
    ("Costa Rica", "cr"),
    ("Croatia", "hr"),
    ("Czechia", "cz"),
    ("Denmark", "dk"),
    ("Estonia", "ee"),
    ("Finland", "fi"),
    ("France", "fr"),
    ("Germany", "de"),
    ("Greece", "gr"),
    ("Hong Kong", "hk"),
    ("Hungary", "hu"),
    ("Iceland", "is"),
    ("Indonesia", "id"),
    ("Ireland", "ie"),
    ("Israel", "il"),
    ("Italy", "it"),
    ("Japan", "jp"),
    ("Korea", "kr"),
    ("Latvia", "lv"),
    ("Lithuania", "lt"),
    ("Luxembourg", "lu"),
    ("Mexico", "mx"),
    ("Netherlands", "nl"),
    ("New Zealand", "nz"),
    ("Norway", "no"),
    ("Peru", "pe"),
    ("Poland", "pl"),
    ("Portugal", "pt"),
    ("Romania", "ro"),
    ("Singapore", "sg"),
    ("Slovak Republic", "sk"),
    ("Slovenia", "si"),
    ("South Africa", "za"),
    ("Spain", "es"),
    ("Sweden", "se"),
    ("Switzerland", "ch"),
    ("Thailand", "th"),
    ("Turkiye", "tr"),
    ("United Kingdom", "gb"),
    ("United States", "us"),
];

pub fn flag_code(economy: &str) -> Option<&'static str> {
    COUNTRY_CODES
        .iter()
        .find(|(name, _)| *name == economy)
        .map(|(_, code)| *code)
}
