//! Free-text location normalization into a "City, Country" pair.
//!
//! Lookups are against static tables: a city → country map (primarily Indian
//! cities plus major global ones), a list of country names, and US state
//! abbreviations. Names match as whole words so that short entries like
//! `us` or `agra` do not fire inside longer words.

use super::title_case;
use ahash::AHashMap;
use serde::Serialize;
use std::sync::LazyLock;

/// City → country, in lookup priority order.
pub const CITY_TO_COUNTRY: &[(&str, &str)] = &[
    ("new york", "USA"), ("los angeles", "USA"), ("chicago", "USA"), ("houston", "USA"),
    ("phoenix", "USA"), ("philadelphia", "USA"), ("san antonio", "USA"), ("san diego", "USA"),
    ("dallas", "USA"), ("san jose", "USA"), ("austin", "USA"), ("jacksonville", "USA"),
    ("fort worth", "USA"), ("columbus", "USA"), ("charlotte", "USA"), ("san francisco", "USA"),
    ("indianapolis", "USA"), ("seattle", "USA"), ("denver", "USA"), ("washington", "USA"),
    ("boston", "USA"), ("nashville", "USA"), ("baltimore", "USA"), ("oklahoma city", "USA"),
    ("louisville", "USA"), ("portland", "USA"), ("las vegas", "USA"), ("milwaukee", "USA"),
    ("albuquerque", "USA"), ("tucson", "USA"), ("fresno", "USA"), ("sacramento", "USA"),
    ("mesa", "USA"), ("kansas city", "USA"), ("atlanta", "USA"), ("omaha", "USA"),
    ("colorado springs", "USA"), ("raleigh", "USA"), ("miami", "USA"), ("oakland", "USA"),
    ("minneapolis", "USA"), ("tulsa", "USA"), ("cleveland", "USA"), ("wichita", "USA"),
    ("arlington", "USA"), ("bakersfield", "USA"), ("tampa", "USA"), ("aurora", "USA"),
    ("honolulu", "USA"), ("london", "UK"), ("manchester", "UK"), ("birmingham", "UK"),
    ("liverpool", "UK"), ("leeds", "UK"), ("glasgow", "UK"), ("edinburgh", "UK"),
    ("paris", "France"), ("berlin", "Germany"), ("madrid", "Spain"), ("rome", "Italy"),
    ("amsterdam", "Netherlands"), ("vienna", "Austria"), ("zurich", "Switzerland"),
    ("toronto", "Canada"), ("vancouver", "Canada"), ("montreal", "Canada"),
    ("calgary", "Canada"), ("ottawa", "Canada"), ("sydney", "Australia"),
    ("melbourne", "Australia"), ("brisbane", "Australia"), ("perth", "Australia"),
    ("adelaide", "Australia"), ("tokyo", "Japan"), ("osaka", "Japan"), ("kyoto", "Japan"),
    ("seoul", "South Korea"), ("busan", "South Korea"), ("beijing", "China"),
    ("shanghai", "China"), ("guangzhou", "China"), ("shenzhen", "China"), ("mumbai", "India"),
    ("delhi", "India"), ("bangalore", "India"), ("hyderabad", "India"), ("chennai", "India"),
    ("kolkata", "India"), ("pune", "India"), ("ahmedabad", "India"), ("surat", "India"),
    ("jaipur", "India"), ("lucknow", "India"), ("kanpur", "India"), ("nagpur", "India"),
    ("indore", "India"), ("thane", "India"), ("bhopal", "India"), ("visakhapatnam", "India"),
    ("pimpri-chinchwad", "India"), ("patna", "India"), ("vadodara", "India"),
    ("ghaziabad", "India"), ("ludhiana", "India"), ("agra", "India"), ("nashik", "India"),
    ("faridabad", "India"), ("meerut", "India"), ("rajkot", "India"),
    ("kalyan-dombivali", "India"), ("vasai-virar", "India"), ("varanasi", "India"),
    ("srinagar", "India"), ("aurangabad", "India"), ("dhanbad", "India"), ("amritsar", "India"),
    ("navi mumbai", "India"), ("allahabad", "India"), ("ranchi", "India"), ("howrah", "India"),
    ("coimbatore", "India"), ("jabalpur", "India"), ("gwalior", "India"),
    ("vijayawada", "India"), ("madurai", "India"), ("raipur", "India"), ("kota", "India"),
    ("chandigarh", "India"), ("guwahati", "India"), ("solapur", "India"),
    ("hubli-dharwad", "India"), ("tiruchirappalli", "India"), ("bareilly", "India"),
    ("mysore", "India"), ("tiruppur", "India"), ("gurgaon", "India"), ("aligarh", "India"),
    ("moradabad", "India"), ("jalandhar", "India"), ("bhubaneswar", "India"),
    ("salem", "India"), ("warangal", "India"), ("guntur", "India"), ("bhiwandi", "India"),
    ("saharanpur", "India"), ("gorakhpur", "India"), ("bikaner", "India"),
    ("amravati", "India"), ("noida", "India"), ("jamshedpur", "India"), ("bhilai", "India"),
    ("cuttack", "India"), ("firozabad", "India"), ("kochi", "India"), ("nellore", "India"),
    ("bhavnagar", "India"), ("dehradun", "India"), ("durgapur", "India"), ("asansol", "India"),
    ("rourkela", "India"), ("nanded", "India"), ("kolhapur", "India"), ("ajmer", "India"),
    ("akola", "India"), ("gulbarga", "India"), ("jamnagar", "India"), ("ujjain", "India"),
    ("loni", "India"), ("siliguri", "India"), ("jhansi", "India"), ("ulhasnagar", "India"),
    ("jammu", "India"), ("sangli", "India"), ("mangalore", "India"), ("erode", "India"),
    ("belgaum", "India"), ("ambattur", "India"), ("tirunelveli", "India"),
    ("malegaon", "India"), ("gaya", "India"), ("jalgaon", "India"), ("udaipur", "India"),
    ("maheshtala", "India"), ("davanagere", "India"), ("kozhikode", "India"),
    ("kurnool", "India"), ("rajahmundry", "India"), ("bokaro", "India"), ("bellary", "India"),
    ("patiala", "India"), ("gopalpur", "India"), ("agartala", "India"), ("bhagalpur", "India"),
    ("muzaffarnagar", "India"), ("bhatpara", "India"), ("panihati", "India"),
    ("latur", "India"), ("dhule", "India"), ("rohtak", "India"), ("korba", "India"),
    ("bhilwara", "India"), ("berhampur", "India"), ("muzaffarpur", "India"),
    ("ahmednagar", "India"), ("mathura", "India"), ("kollam", "India"), ("avadi", "India"),
    ("kadapa", "India"), ("sambalpur", "India"), ("bilaspur", "India"),
    ("shahjahanpur", "India"), ("satara", "India"), ("bijapur", "India"), ("rampur", "India"),
    ("shivamogga", "India"), ("chandrapur", "India"), ("junagadh", "India"),
    ("thrissur", "India"), ("alwar", "India"), ("bardhaman", "India"), ("kakinada", "India"),
    ("nizamabad", "India"), ("parbhani", "India"), ("tumkur", "India"), ("khammam", "India"),
    ("bihar sharif", "India"), ("panipat", "India"), ("darbhanga", "India"),
    ("aizawl", "India"), ("dewas", "India"), ("karnal", "India"), ("bathinda", "India"),
    ("jalna", "India"), ("eluru", "India"), ("barabanki", "India"), ("purnia", "India"),
    ("satna", "India"), ("mau", "India"), ("sonipat", "India"), ("farrukhabad", "India"),
    ("sagar", "India"), ("durg", "India"), ("imphal", "India"), ("ratlam", "India"),
    ("hapur", "India"), ("arrah", "India"), ("anantapur", "India"), ("karimnagar", "India"),
    ("etawah", "India"), ("ambernath", "India"), ("bharatpur", "India"), ("begusarai", "India"),
    ("new delhi", "India"), ("gandhidham", "India"), ("baranagar", "India"),
    ("tiruvottiyur", "India"), ("puducherry", "India"), ("sikar", "India"),
    ("thoothukudi", "India"), ("rewa", "India"), ("mirzapur", "India"), ("raichur", "India"),
    ("pali", "India"), ("ramagundam", "India"), ("haridwar", "India"),
    ("vijayanagaram", "India"), ("katihar", "India"), ("nagarcoil", "India"),
    ("sri ganganagar", "India"), ("mango", "India"), ("thanjavur", "India"),
    ("bulandshahr", "India"), ("uluberia", "India"), ("sambhal", "India"),
    ("singrauli", "India"), ("nadiad", "India"), ("secunderabad", "India"),
    ("naihati", "India"), ("yamunanagar", "India"), ("pallavaram", "India"), ("bidar", "India"),
    ("munger", "India"), ("panchkula", "India"), ("burhanpur", "India"), ("kharagpur", "India"),
    ("dindigul", "India"), ("gandhinagar", "India"), ("hospet", "India"), ("malda", "India"),
    ("ongole", "India"), ("deoghar", "India"), ("chapra", "India"), ("haldia", "India"),
    ("khandwa", "India"), ("nandyal", "India"), ("chittoor", "India"), ("morena", "India"),
    ("amroha", "India"), ("anand", "India"), ("bhind", "India"), ("ambala", "India"),
    ("morbi", "India"), ("fatehpur", "India"), ("rae bareli", "India"), ("bhusawal", "India"),
    ("orai", "India"), ("bahraich", "India"), ("vellore", "India"), ("mahesana", "India"),
    ("raiganj", "India"), ("sirsa", "India"), ("danapur", "India"), ("serampore", "India"),
    ("guna", "India"), ("jaunpur", "India"), ("panvel", "India"), ("shivpuri", "India"),
    ("unnao", "India"), ("alappuzha", "India"), ("kottayam", "India"),
    ("machilipatnam", "India"), ("shimla", "India"), ("adoni", "India"), ("tenali", "India"),
    ("proddatur", "India"), ("saharsa", "India"), ("hindupur", "India"), ("sasaram", "India"),
    ("hajipur", "India"), ("bhimavaram", "India"), ("dehri", "India"), ("madanapalle", "India"),
    ("siwan", "India"), ("bettiah", "India"), ("guntakal", "India"), ("srikakulam", "India"),
    ("motihari", "India"), ("dharmavaram", "India"), ("gudivada", "India"),
    ("narasaraopet", "India"), ("bagaha", "India"), ("miryalaguda", "India"),
    ("tadipatri", "India"), ("kishanganj", "India"), ("karaikudi", "India"),
    ("suryapet", "India"), ("jamalpur", "India"), ("kavali", "India"),
    ("tadepalligudem", "India"), ("amaravati", "India"), ("buxar", "India"),
    ("jehanabad", "India"),
];

/// Recognized country names and aliases, lowercase.
pub const COUNTRIES: &[&str] = &[
    "usa", "united states", "america", "us", "canada", "uk", "united kingdom", "england",
    "scotland", "wales", "ireland", "france", "germany", "italy", "spain", "netherlands",
    "belgium", "switzerland", "austria", "sweden", "norway", "denmark", "finland", "poland",
    "czech republic", "hungary", "australia", "new zealand", "japan", "south korea", "china",
    "india", "singapore", "malaysia", "thailand", "philippines", "indonesia", "vietnam", "brazil",
    "argentina", "chile", "colombia", "mexico", "peru", "venezuela",
];

/// US state abbreviations; seeing one in the country slot implies the USA.
pub const STATE_ABBREVIATIONS: &[(&str, &str)] = &[
    ("ny", "New York"), ("ca", "California"), ("tx", "Texas"), ("fl", "Florida"),
    ("il", "Illinois"), ("pa", "Pennsylvania"), ("oh", "Ohio"), ("ga", "Georgia"),
    ("nc", "North Carolina"), ("mi", "Michigan"), ("nj", "New Jersey"), ("va", "Virginia"),
    ("wa", "Washington"), ("az", "Arizona"), ("ma", "Massachusetts"), ("tn", "Tennessee"),
    ("in", "Indiana"), ("mo", "Missouri"), ("md", "Maryland"), ("wi", "Wisconsin"),
    ("co", "Colorado"), ("mn", "Minnesota"), ("sc", "South Carolina"), ("al", "Alabama"),
];

const BASE_CONFIDENCE: f32 = 0.3;
const PAIR_MATCH_BONUS: f32 = 0.3;
const STATE_BONUS: f32 = 0.2;
const SINGLE_MATCH_BONUS: f32 = 0.2;

static CITY_INDEX: LazyLock<AHashMap<&'static str, &'static str>> =
    LazyLock::new(|| CITY_TO_COUNTRY.iter().copied().collect());

/// Result of interpreting a free-text location.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationMatch {
    pub original_input: String,
    pub city: String,
    pub country: String,
    pub formatted_location: String,
    pub confidence: f32,
}

/// Normalize `input` into a canonical city and country. Never fails.
pub fn process_location_input(input: &str) -> LocationMatch {
    let normalized = input.trim().to_lowercase();
    let parts: Vec<&str> = normalized.split([',', ';']).map(str::trim).collect();
    let mut city = String::new();
    let mut country = String::new();
    let mut confidence = BASE_CONFIDENCE;

    if parts.len() >= 2 {
        let potential_city = parts[0];
        // "London, Ontario, Canada": the country is the last part
        let potential_country = parts[parts.len() - 1];

        if let Some(found) = find_city(potential_city) {
            city = found.to_string();
            confidence += PAIR_MATCH_BONUS;
        }
        if let Some(found) = find_country(potential_country) {
            country = canonical_country(found);
            confidence += PAIR_MATCH_BONUS;
        } else if parts[1..]
            .iter()
            .any(|part| STATE_ABBREVIATIONS.iter().any(|(abbr, _)| abbr == part))
        {
            country = "USA".to_string();
            confidence += STATE_BONUS;
        }
    } else if let Some(single) = parts.first().copied().filter(|s| !s.is_empty()) {
        if let Some(found) = find_city(single) {
            city = found.to_string();
            confidence += SINGLE_MATCH_BONUS;
        }
        if let Some(found) = find_country(single) {
            country = canonical_country(found);
            confidence += SINGLE_MATCH_BONUS;
        }
    }

    if city.is_empty() && country.is_empty() {
        if parts.len() >= 2 {
            city = parts[0].to_string();
            country = parts[1].to_string();
        } else {
            city = normalized.clone();
            country = "Unknown".to_string();
        }
    } else if country.is_empty()
        && let Some(known) = CITY_INDEX.get(city.as_str())
    {
        country = (*known).to_string();
    }

    let city = title_case(&city);
    let country = if country.chars().all(|c| c.is_ascii_uppercase()) {
        country
    } else {
        title_case(&country)
    };
    let formatted_location = if city.is_empty() {
        country.clone()
    } else {
        format!("{}, {}", city, country)
    };

    LocationMatch {
        original_input: input.to_string(),
        city,
        country,
        formatted_location,
        confidence,
    }
}

/// Up to three matching cities followed by up to two matching countries.
pub fn location_suggestions(input: &str) -> Vec<String> {
    let normalized = input.trim().to_lowercase();
    if normalized.is_empty() {
        return Vec::new();
    }

    let cities = CITY_TO_COUNTRY
        .iter()
        .map(|(city, _)| *city)
        .filter(|city| city.contains(&normalized) || normalized.contains(city))
        .take(3)
        .map(title_case);
    let countries = COUNTRIES
        .iter()
        .filter(|country| country.contains(&normalized))
        .take(2)
        .map(|country| canonical_country(country));

    cities.chain(countries).collect()
}

/// Country for a known city name (case-insensitive).
pub fn city_country(city: &str) -> Option<&'static str> {
    CITY_INDEX.get(city.trim().to_lowercase().as_str()).copied()
}

fn find_city(text: &str) -> Option<&'static str> {
    CITY_TO_COUNTRY
        .iter()
        .map(|(city, _)| *city)
        .find(|city| *city == text || contains_phrase(text, city))
}

fn find_country(text: &str) -> Option<&'static str> {
    COUNTRIES
        .iter()
        .copied()
        .find(|country| *country == text || contains_phrase(text, country))
}

fn canonical_country(name: &str) -> String {
    match name {
        "usa" | "us" | "america" | "united states" => "USA".to_string(),
        "uk" | "united kingdom" => "UK".to_string(),
        other => title_case(other),
    }
}

/// Whether `needle` occurs in `haystack` delimited by non-alphanumeric characters.
pub(crate) fn contains_phrase(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let end = start + needle.len();
        let before = haystack[..start].chars().next_back();
        let after = haystack[end..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}
