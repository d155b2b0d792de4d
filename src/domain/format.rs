//! Display masks and text helpers.
//!
//! Every function here is total: input that does not fit a mask falls back
//! to the (partially processed) input instead of failing.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::taxpayer::strip_non_digits;

static CPF_MASK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{3})(\d{3})(\d{3})(\d{2})").expect("static pattern is valid")
});

static CNPJ_MASK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{2})(\d{3})(\d{3})(\d{4})(\d{2})").expect("static pattern is valid")
});

static LANDLINE_MASK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})(\d{4})(\d{4})").expect("static pattern is valid"));

static MOBILE_MASK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(\d{2})(\d{5})(\d{4})").expect("static pattern is valid"));

static SLUG_DISALLOWED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9 -]").expect("static pattern is valid"));

static WHITESPACE_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static pattern is valid"));

static DASH_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-+").expect("static pattern is valid"));

/// Base letters for U+0100..=U+017F. Letters without a canonical
/// decomposition (`Đ`, `Ł`, `Œ`, ...) map to themselves.
#[rustfmt::skip]
const LATIN_EXTENDED_A: [char; 128] = [
    'A', 'a', 'A', 'a', 'A', 'a', 'C', 'c', 'C', 'c', 'C', 'c', 'C', 'c', 'D', 'd',
    'Đ', 'đ', 'E', 'e', 'E', 'e', 'E', 'e', 'E', 'e', 'E', 'e', 'G', 'g', 'G', 'g',
    'G', 'g', 'G', 'g', 'H', 'h', 'Ħ', 'ħ', 'I', 'i', 'I', 'i', 'I', 'i', 'I', 'i',
    'I', 'ı', 'Ĳ', 'ĳ', 'J', 'j', 'K', 'k', 'ĸ', 'L', 'l', 'L', 'l', 'L', 'l', 'Ŀ',
    'ŀ', 'Ł', 'ł', 'N', 'n', 'N', 'n', 'N', 'n', 'ŉ', 'Ŋ', 'ŋ', 'O', 'o', 'O', 'o',
    'O', 'o', 'Œ', 'œ', 'R', 'r', 'R', 'r', 'R', 'r', 'S', 's', 'S', 's', 'S', 's',
    'S', 's', 'T', 't', 'T', 't', 'Ŧ', 'ŧ', 'U', 'u', 'U', 'u', 'U', 'u', 'U', 'u',
    'U', 'u', 'U', 'u', 'W', 'w', 'Y', 'y', 'Y', 'Z', 'z', 'Z', 'z', 'Z', 'z', 'ſ',
];

/// Words kept in lower case by [`capitalize_name`].
const NAME_PARTICLES: [&str; 6] = ["de", "da", "do", "das", "dos", "e"];

/// Formats a CPF as `###.###.###-##`.
///
/// Non-digits are stripped first. With fewer than eleven digits the stripped
/// digits are returned as they are; surplus digits are appended after the
/// mask.
///
/// ```
/// use cidade::domain::format::format_cpf;
///
/// assert_eq!(format_cpf("12345678901"), "123.456.789-01");
/// assert_eq!(format_cpf("123.456"), "123456");
/// ```
#[must_use]
pub fn format_cpf(input: &str) -> String {
    let digits = strip_non_digits(input);
    CPF_MASK.replace(&digits, "$1.$2.$3-$4").into_owned()
}

/// Formats a CNPJ as `##.###.###/####-##`, with the same fallbacks as
/// [`format_cpf`].
#[must_use]
pub fn format_cnpj(input: &str) -> String {
    let digits = strip_non_digits(input);
    CNPJ_MASK.replace(&digits, "$1.$2.$3/$4-$5").into_owned()
}

/// Formats a Brazilian phone number.
///
/// Ten digits format as a landline `(##) ####-####`, eleven as a mobile
/// `(##) #####-####`. Any other digit count returns the original input
/// untouched, punctuation included.
///
/// ```
/// use cidade::domain::format::format_phone;
///
/// assert_eq!(format_phone("11999991234"), "(11) 99999-1234");
/// assert_eq!(format_phone("1131139000"), "(11) 3113-9000");
/// assert_eq!(format_phone("12-3"), "12-3");
/// ```
#[must_use]
pub fn format_phone(input: &str) -> String {
    let digits = strip_non_digits(input);
    match digits.len() {
        10 => LANDLINE_MASK.replace(&digits, "($1) $2-$3").into_owned(),
        11 => MOBILE_MASK.replace(&digits, "($1) $2-$3").into_owned(),
        _ => input.to_string(),
    }
}

/// Formats an amount in reais: `R$ 1234,50`.
///
/// Two fixed decimals, comma as decimal separator, no thousands separator.
/// An amount exactly halfway between two cents rounds away from zero
/// (`0.125` gives `R$ 0,13`); anything else rounds to the nearest cent of
/// its exact binary value, so `1.005` (stored just below) gives `R$ 1,00`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    // Only multiples of 1/8 can sit exactly on a half cent.
    let amount = if (amount * 8.0).fract() == 0.0 {
        (amount * 100.0).round() / 100.0
    } else {
        amount
    };
    format!("R$ {amount:.2}").replace('.', ",")
}

/// Upper-cases the first character and lower-cases the rest.
#[must_use]
pub fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars.as_str().to_lowercase().chars()).collect()
    })
}

/// Capitalizes each space-separated word of a person's or place's name,
/// leaving the Portuguese particles `de`, `da`, `do`, `das`, `dos` and `e`
/// in lower case.
///
/// ```
/// use cidade::domain::format::capitalize_name;
///
/// assert_eq!(capitalize_name("JOÃO DA SILVA"), "João da Silva");
/// ```
#[must_use]
pub fn capitalize_name(name: &str) -> String {
    name.to_lowercase()
        .split(' ')
        .map(|word| {
            if NAME_PARTICLES.contains(&word) {
                word.to_string()
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replaces accented Latin-1 and Latin Extended-A letters with their
/// unaccented base letter and drops stray combining diacritical marks.
#[must_use]
pub fn remove_accents(input: &str) -> String {
    input
        .chars()
        .filter(|c| !('\u{0300}'..='\u{036f}').contains(c))
        .map(fold_accent)
        .collect()
}

const fn fold_accent(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'À' | 'Á' | 'Â' | 'Ã' | 'Ä' | 'Å' => 'A',
        'ç' => 'c',
        'Ç' => 'C',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'È' | 'É' | 'Ê' | 'Ë' => 'E',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'Ì' | 'Í' | 'Î' | 'Ï' => 'I',
        'ñ' => 'n',
        'Ñ' => 'N',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' => 'o',
        'Ò' | 'Ó' | 'Ô' | 'Õ' | 'Ö' => 'O',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'Ù' | 'Ú' | 'Û' | 'Ü' => 'U',
        'ý' | 'ÿ' => 'y',
        'Ý' => 'Y',
        '\u{0100}'..='\u{017f}' => LATIN_EXTENDED_A[c as usize - 0x100],
        other => other,
    }
}

/// Builds a URL-friendly slug: accents removed, lower case, only
/// `[a-z0-9-]`, whitespace runs turned into a single dash and dash runs
/// collapsed.
///
/// Leading or trailing whitespace becomes a leading or trailing dash; it is
/// not trimmed away.
///
/// ```
/// use cidade::domain::format::slugify;
///
/// assert_eq!(slugify("Iluminação Pública"), "iluminacao-publica");
/// assert_eq!(slugify(" -x- "), "-x-");
/// ```
#[must_use]
pub fn slugify(input: &str) -> String {
    let lowered = remove_accents(input).to_lowercase();
    let cleaned = SLUG_DISALLOWED.replace_all(&lowered, "");
    let dashed = WHITESPACE_RUN.replace_all(&cleaned, "-");
    DASH_RUN.replace_all(&dashed, "-").into_owned()
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;

    #[test_case("12345678901", "123.456.789-01"; "bare digits")]
    #[test_case("123.456.789-01", "123.456.789-01"; "already formatted")]
    #[test_case("1234567", "1234567"; "too short returns stripped")]
    #[test_case("12.34", "1234"; "too short strips punctuation")]
    #[test_case("123456789012", "123.456.789-012"; "surplus digits appended")]
    #[test_case("", ""; "empty")]
    fn cpf_mask(input: &str, expected: &str) {
        assert_eq!(format_cpf(input), expected);
    }

    #[test_case("46395000000139", "46.395.000/0001-39"; "bare digits")]
    #[test_case("46.395.000/0001-39", "46.395.000/0001-39"; "already formatted")]
    #[test_case("463950", "463950"; "too short")]
    fn cnpj_mask(input: &str, expected: &str) {
        assert_eq!(format_cnpj(input), expected);
    }

    #[test_case("11999991234", "(11) 99999-1234"; "mobile")]
    #[test_case("1131139000", "(11) 3113-9000"; "landline")]
    #[test_case("123", "123"; "too short unchanged")]
    #[test_case("(11) 123", "(11) 123"; "too short keeps punctuation")]
    #[test_case("551199999123400", "551199999123400"; "too long unchanged")]
    fn phone_mask(input: &str, expected: &str) {
        assert_eq!(format_phone(input), expected);
    }

    #[test]
    fn phone_mask_is_idempotent() {
        for raw in ["11999991234", "1131139000"] {
            let once = format_phone(raw);
            assert_eq!(format_phone(&once), once);
        }
    }

    #[test]
    fn cpf_mask_roundtrips_through_strip() {
        let digits = "11144477735";
        assert_eq!(strip_non_digits(&format_cpf(digits)), digits);
    }

    #[test_case(1234.5, "R$ 1234,50"; "one decimal")]
    #[test_case(0.0, "R$ 0,00"; "zero")]
    #[test_case(15.0, "R$ 15,00"; "integer")]
    #[test_case(1_000_000.256, "R$ 1000000,26"; "no thousands separator")]
    #[test_case(-3.1, "R$ -3,10"; "negative")]
    #[test_case(0.125, "R$ 0,13"; "half cent rounds up")]
    #[test_case(2.625, "R$ 2,63"; "half cent above even")]
    #[test_case(10.125, "R$ 10,13"; "half cent with integer part")]
    #[test_case(-0.125, "R$ -0,13"; "negative half cent rounds away from zero")]
    #[test_case(0.25, "R$ 0,25"; "exact eighth that is not a tie")]
    #[test_case(1.005, "R$ 1,00"; "near tie stored below half")]
    fn currency(amount: f64, expected: &str) {
        assert_eq!(format_currency(amount), expected);
    }

    #[test_case("maria", "Maria")]
    #[test_case("mARIA", "Maria")]
    #[test_case("", "")]
    #[test_case("ágata", "Ágata")]
    fn capitalize_word(input: &str, expected: &str) {
        assert_eq!(capitalize(input), expected);
    }

    #[test]
    fn name_particles_stay_lower_case() {
        assert_eq!(
            capitalize_name("ana paula DOS santos e silva"),
            "Ana Paula dos Santos e Silva"
        );
        assert_eq!(capitalize_name("são paulo"), "São Paulo");
    }

    #[test]
    fn accents_are_removed() {
        assert_eq!(remove_accents("São Paulo, Ceará, Piauí"), "Sao Paulo, Ceara, Piaui");
        assert_eq!(remove_accents("AÇÃO"), "ACAO");
        // "e" followed by a combining acute accent.
        assert_eq!(remove_accents("cafe\u{0301}"), "cafe");
    }

    #[test_case("Şeyma Ŕ Ÿ ā", "Seyma R Y a"; "extended a letters fold")]
    #[test_case("Łódź", "Łodz"; "letters without decomposition stay")]
    #[test_case("Œuvre ĳ", "Œuvre ĳ"; "ligatures stay")]
    fn extended_latin_accents(input: &str, expected: &str) {
        assert_eq!(remove_accents(input), expected);
    }

    #[test_case("Iluminação Pública", "iluminacao-publica")]
    #[test_case("  Buraco   na Via! ", "-buraco-na-via-")]
    #[test_case(" -x- ", "-x-")]
    #[test_case("Coleta -- de Lixo", "coleta-de-lixo")]
    #[test_case("Saúde 24h", "saude-24h")]
    fn slugs(input: &str, expected: &str) {
        assert_eq!(slugify(input), expected);
    }
}
