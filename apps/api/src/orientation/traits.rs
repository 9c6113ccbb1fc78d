//! Reference tables for the trait vocabularies and the normalization chain that maps
//! every alternate spelling of a RIASEC trait onto its canonical French name.
//!
//! The tables are immutable `static` data, shared read-only by every request.

/// One RIASEC trait and its interpretation material.
#[derive(Debug)]
pub struct RiasecProfile {
    /// Canonical (accented French) trait name. Key of every score map.
    pub name: &'static str,
    pub code: &'static str,
    pub english: &'static str,
    pub description: &'static str,
    pub forces: &'static [&'static str],
    pub work_style: &'static str,
    pub sectors: &'static [&'static str],
    pub advice: &'static str,
}

/// RIASEC traits in canonical order (R, I, A, S, E, C).
pub static RIASEC: &[RiasecProfile] = &[
    RiasecProfile {
        name: "Réaliste",
        code: "R",
        english: "Realistic",
        description: "Vous êtes pragmatique et aimez travailler avec vos mains. Les activités concrètes, techniques et physiques vous motivent.",
        forces: &[
            "Sens pratique et concret",
            "Habileté manuelle et technique",
            "Endurance et persévérance",
            "Capacité à résoudre des problèmes concrets",
        ],
        work_style: "Vous préférez les environnements de travail structurés où vous pouvez voir le résultat concret de vos efforts. Vous êtes à l'aise avec les outils, les machines et le travail en extérieur.",
        sectors: &["Ingénierie & BTP", "Agriculture & Environnement", "Technologie & Informatique"],
        advice: "Privilégiez les formations avec beaucoup de pratique (stages, alternance, travaux pratiques). Au Togo, les secteurs du BTP et de l'agriculture offrent de belles opportunités.",
    },
    RiasecProfile {
        name: "Investigateur",
        code: "I",
        english: "Investigative",
        description: "Vous êtes curieux, analytique et aimez comprendre le fonctionnement des choses. La recherche et la résolution de problèmes complexes vous passionnent.",
        forces: &[
            "Esprit analytique et critique",
            "Curiosité intellectuelle",
            "Rigueur scientifique",
            "Capacité d'abstraction",
        ],
        work_style: "Vous excellez dans les environnements qui demandent de la réflexion, de l'analyse et de la recherche. Vous aimez travailler de manière autonome sur des problèmes complexes.",
        sectors: &["Technologie & Informatique", "Santé", "Agriculture & Environnement"],
        advice: "Investissez dans les études longues (Master, Doctorat) si possible. Les métiers de la data et de la recherche sont en forte croissance en Afrique de l'Ouest.",
    },
    RiasecProfile {
        name: "Artistique",
        code: "A",
        english: "Artistic",
        description: "Vous êtes créatif, expressif et aimez l'innovation. Les activités qui permettent l'expression personnelle et la création vous attirent.",
        forces: &[
            "Créativité et imagination",
            "Sens esthétique développé",
            "Originalité et innovation",
            "Sensibilité et expressivité",
        ],
        work_style: "Vous recherchez des environnements de travail flexibles, non conventionnels, qui laissent place à la créativité et à l'expression personnelle.",
        sectors: &["Création & Médias", "Éducation", "Commerce & Entrepreneuriat"],
        advice: "Constituez un portfolio solide et explorez les formations créatives. Le secteur digital au Togo ouvre de nouvelles voies pour les créatifs (design, contenu, UX).",
    },
    RiasecProfile {
        name: "Social",
        code: "S",
        english: "Social",
        description: "Vous aimez aider, enseigner et accompagner les autres. Les relations humaines et le service aux personnes sont au cœur de vos motivations.",
        forces: &[
            "Empathie et écoute active",
            "Capacité à travailler en équipe",
            "Communication interpersonnelle",
            "Patience et bienveillance",
        ],
        work_style: "Vous vous épanouissez dans les métiers de contact humain, d'accompagnement et de service. Le travail en équipe et l'aide aux autres vous motivent profondément.",
        sectors: &["Santé", "Éducation", "Droit & Administration"],
        advice: "Les stages en milieu hospitalier, éducatif ou associatif vous aideront à confirmer votre vocation. Le Togo a un grand besoin de professionnels du social et de la santé.",
    },
    RiasecProfile {
        name: "Entrepreneur",
        code: "E",
        english: "Enterprising",
        description: "Vous êtes ambitieux, leader et aimez convaincre. Le management, la prise de décision et les défis commerciaux vous motivent.",
        forces: &[
            "Leadership et charisme",
            "Capacité de persuasion",
            "Prise d'initiative",
            "Goût du risque calculé",
        ],
        work_style: "Vous préférez les environnements dynamiques et compétitifs. Vous aimez diriger, influencer et prendre des décisions stratégiques.",
        sectors: &["Commerce & Entrepreneuriat", "Finance & Banque", "Droit & Administration"],
        advice: "Participez aux programmes d'incubation (Woelab, CUBE) et aux formations en gestion. L'écosystème entrepreneurial togolais est dynamique avec le soutien du FAIEJ.",
    },
    RiasecProfile {
        name: "Conventionnel",
        code: "C",
        english: "Conventional",
        description: "Vous êtes organisé, méthodique et aimez la précision. Les tâches structurées, les procédures claires et l'ordre vous conviennent.",
        forces: &[
            "Organisation et méthode",
            "Rigueur et précision",
            "Fiabilité et constance",
            "Respect des règles et procédures",
        ],
        work_style: "Vous excellez dans les environnements structurés avec des procédures claires. Vous êtes fiable, ponctuel et attentif aux détails.",
        sectors: &["Finance & Banque", "Droit & Administration", "Technologie & Informatique"],
        advice: "Les certifications professionnelles (comptabilité, finance, gestion) augmentent votre employabilité. Les secteurs bancaire et administratif au Togo recrutent régulièrement.",
    },
];

/// Unaccented spellings found in seeded career data.
const UNACCENTED_ALIASES: &[(&str, &str)] = &[("Realiste", "Réaliste")];

/// One side of a personality dimension.
#[derive(Debug)]
pub struct PersonalitySide {
    pub label: &'static str,
    pub description: &'static str,
}

/// Opposed personality pair, keyed by the category tag questions carry (e.g. `E-I`).
#[derive(Debug)]
pub struct PersonalityPair {
    pub tag: &'static str,
    pub left: PersonalitySide,
    pub right: PersonalitySide,
}

pub static PERSONALITY_PAIRS: &[PersonalityPair] = &[
    PersonalityPair {
        tag: "E-I",
        left: PersonalitySide {
            label: "Extraversion",
            description: "Vous puisez votre énergie dans les interactions sociales.",
        },
        right: PersonalitySide {
            label: "Introversion",
            description: "Vous puisez votre énergie dans la réflexion intérieure.",
        },
    },
    PersonalityPair {
        tag: "S-N",
        left: PersonalitySide {
            label: "Sensation",
            description: "Vous vous fiez aux faits concrets et à l'expérience.",
        },
        right: PersonalitySide {
            label: "Intuition",
            description: "Vous vous fiez aux possibilités et aux idées abstraites.",
        },
    },
    PersonalityPair {
        tag: "T-F",
        left: PersonalitySide {
            label: "Pensée",
            description: "Vous prenez vos décisions de manière logique et objective.",
        },
        right: PersonalitySide {
            label: "Sentiment",
            description: "Vous prenez vos décisions en tenant compte des valeurs et des personnes.",
        },
    },
    PersonalityPair {
        tag: "J-P",
        left: PersonalitySide {
            label: "Jugement",
            description: "Vous préférez la planification et l'organisation.",
        },
        right: PersonalitySide {
            label: "Perception",
            description: "Vous préférez la flexibilité et la spontanéité.",
        },
    },
];

pub fn riasec_profile(name: &str) -> Option<&'static RiasecProfile> {
    RIASEC.iter().find(|p| p.name == name)
}

pub fn personality_side(label: &str) -> Option<&'static PersonalitySide> {
    PERSONALITY_PAIRS
        .iter()
        .flat_map(|p| [&p.left, &p.right])
        .find(|s| s.label == label)
}

/// Reference description for any known trait, empty when the trait has no table entry.
pub fn trait_description(name: &str) -> &'static str {
    riasec_profile(name)
        .map(|p| p.description)
        .or_else(|| personality_side(name).map(|s| s.description))
        .unwrap_or("")
}

/// Maps a trait tag in any encoding (English, single-letter code, unaccented French)
/// to its canonical French name. Unknown tags pass through unchanged.
pub fn normalize_trait(tag: &str) -> String {
    if let Some(p) = RIASEC.iter().find(|p| p.english == tag) {
        return p.name.to_string();
    }
    if let Some(p) = RIASEC.iter().find(|p| p.code == tag) {
        return p.name.to_string();
    }
    if let Some((_, canonical)) = UNACCENTED_ALIASES.iter().find(|(alias, _)| *alias == tag) {
        return canonical.to_string();
    }
    tag.to_string()
}

/// Expands trait names with every spelling a career row may use for them.
/// The input traits come first, duplicates are dropped.
pub fn trait_search_variants(traits: &[String]) -> Vec<String> {
    let mut variants: Vec<String> = Vec::new();
    let mut push = |v: &str| {
        if !variants.iter().any(|existing| existing == v) {
            variants.push(v.to_string());
        }
    };

    for t in traits {
        push(t);
    }
    for t in traits {
        let canonical = normalize_trait(t);
        if let Some(profile) = riasec_profile(&canonical) {
            push(profile.name);
            push(profile.english);
        }
        for (alias, target) in UNACCENTED_ALIASES {
            if *target == canonical {
                push(alias);
            }
        }
    }
    variants
}

/// `R` → `Realistic`; anything that is not a RIASEC code is returned unchanged.
pub fn riasec_code_to_english(code: &str) -> String {
    RIASEC
        .iter()
        .find(|p| p.code == code)
        .map(|p| p.english.to_string())
        .unwrap_or_else(|| code.to_string())
}
