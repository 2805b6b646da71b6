// src/extract/keywords.rs
//
// Immutable keyword and pattern tables shared by the extractors. The lists
// are tuned for Japanese corporate sites with English fallbacks; extractors
// take the rule structs as constructor parameters so tests can override them.

use once_cell::sync::Lazy;
use regex::Regex;

pub static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}").unwrap());

pub static EMAIL_EXACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").unwrap());

/// Obfuscation token replacements, applied in order during normalization
/// and when reconstructing addresses around an obfuscated match.
pub static OBFUSCATION_PATTERNS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    vec![
        (Regex::new(r"(?i)\[at\]").unwrap(), "@"),
        (Regex::new(r"(?i)\(at\)").unwrap(), "@"),
        (Regex::new(r"(?i)\s+at\s+").unwrap(), "@"),
        (Regex::new(r"(?i)\[dot\]").unwrap(), "."),
        (Regex::new(r"(?i)\(dot\)").unwrap(), "."),
        (Regex::new(r"(?i)\s+dot\s+").unwrap(), "."),
    ]
});

/// JS string-concatenation assembly: "info" + "@" + "example.co.jp"
pub static JS_ASSEMBLY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"["']([A-Za-z0-9._%+-]+)["']\s*\+\s*["']@["']\s*\+\s*["']([A-Za-z0-9.-]+\.[A-Za-z]{2,})["']"#,
    )
    .unwrap()
});

/// Validation and scoring tables for the email extractor.
#[derive(Debug, Clone)]
pub struct EmailRules {
    /// Substrings that disqualify an address outright.
    pub reject_patterns: Vec<String>,
    /// Personal/free-mail domains, filtered out by business-contact callers.
    pub exclude_domains: Vec<String>,
    /// Local-part keywords that signal a published business contact.
    pub priority_local_keywords: Vec<String>,
    /// Local parts that signal an operational mailbox, not a contact.
    pub generic_local_parts: Vec<String>,
}

impl EmailRules {
    /// Whether the address sits on a personal/free-mail provider rather than
    /// a dedicated business domain.
    pub fn is_free_mail(&self, email: &str) -> bool {
        match email.split_once('@') {
            Some((_, domain)) => self
                .exclude_domains
                .iter()
                .any(|excluded| domain == excluded.as_str()),
            None => false,
        }
    }
}

impl Default for EmailRules {
    fn default() -> Self {
        Self {
            reject_patterns: to_strings(&["example.com", "test@", "@test", "noreply", "no-reply"]),
            exclude_domains: to_strings(&[
                "gmail.com",
                "yahoo.com",
                "hotmail.com",
                "outlook.com",
                "aol.com",
                "mail.com",
                "protonmail.com",
                "icloud.com",
                "qq.com",
                "sina.com",
                "gmail.jp",
                "yahoo.co.jp",
            ]),
            priority_local_keywords: to_strings(&[
                "contact",
                "info",
                "support",
                "sales",
                "inquiry",
                "hello",
                "お問い合わせ",
                "問い合わせ",
            ]),
            generic_local_parts: to_strings(&["admin", "webmaster", "postmaster"]),
        }
    }
}

/// Ancestor markers for the context rubric: class/id substrings that mark a
/// high-value section of the page, and ones that mark low-value chrome.
pub const POSITIVE_SECTION_MARKERS: &[&str] = &["contact", "footer", "about"];
pub const NEGATIVE_SECTION_MARKERS: &[&str] = &["comment", "sidebar", "social", "blog"];

/// Japanese legal-entity suffix words, strong signals of a company name.
pub const LEGAL_ENTITIES: &[&str] = &[
    "株式会社",
    "有限会社",
    "合同会社",
    "合資会社",
    "合名会社",
    "一般社団法人",
    "一般財団法人",
    "公益社団法人",
    "公益財団法人",
    "特定非営利活動法人",
    "学校法人",
    "医療法人",
    "社会医療法人",
    "社会福祉法人",
    "宗教法人",
];

/// Legal-entity marker followed by the entity's name characters.
pub static LEGAL_ENTITY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        "(株式会社|有限会社|合同会社|合資会社|合名会社|一般社団法人|一般財団法人|\
         公益社団法人|公益財団法人|特定非営利活動法人|学校法人|医療法人|\
         社会医療法人|社会福祉法人|宗教法人)\
         [A-Za-z0-9一-龥ぁ-んァ-ン・ー\\s]+",
    )
    .unwrap()
});

/// Copyright line: © 株式会社〇〇
pub static COPYRIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new("[©Ⓒ]\\s*(株式会社|有限会社|合同会社)[A-Za-z0-9一-龥ぁ-んァ-ン・ー\\s]+").unwrap()
});

/// Title suffixes stripped during name cleaning.
pub static CLEAN_SUFFIXES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"\s*[|｜]\s*公式サイト",
        r"(?i)\s*[|｜]\s*Official",
        r"(?i)\s*-\s*Home",
        r"\s*-\s*TOP",
        r"\s*トップ",
        r"\s*TOP",
        r"\s*ホーム",
        r"\s*Home",
        r"\s*-\s*企業名",
        r"\s*-\s*会社情報",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// Link texts that lead to a company profile page.
pub const COMPANY_INFO_KEYWORDS: &[&str] = &[
    "会社概要",
    "会社情報",
    "企業情報",
    "企業概要",
    "About",
    "About us",
    "About Us",
    "会社について",
    "企業について",
];

/// Label cells that carry the official name on a profile page.
pub const COMPANY_NAME_FIELDS: &[&str] =
    &["会社名", "Company Name", "法人名", "企業名", "商号", "名称"];

/// Bare generic words that cannot stand alone as a company name.
pub const GENERIC_NAMES: &[&str] = &[
    "home",
    "top",
    "index",
    "page",
    "site",
    "website",
    "company",
    "corporation",
    "inc",
    "ltd",
];

/// Product/service descriptors that disqualify a name candidate.
pub const PRODUCT_KEYWORDS: &[&str] = &["サービス", "product", "service", "solution"];

/// Keywords that mark a low-value name candidate in the point rubric.
pub const JUNK_NAME_KEYWORDS: &[&str] = &["ホームページ", "サイト", "婚活", "お問い合わせ"];

pub const CONTACT_KEYWORDS_JA: &[&str] = &[
    "お問い合わせ",
    "お問合せ",
    "問い合わせ",
    "ご相談",
    "資料請求",
    "応募フォーム",
    "コンタクト",
    "お申し込み",
    "お問い合わせフォーム",
    "問い合わせフォーム",
];

pub const CONTACT_KEYWORDS_EN: &[&str] = &[
    "contact",
    "inquiry",
    "support",
    "form",
    "request",
    "consultation",
];

/// Contact-like URL path segments.
pub static CONTACT_URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)/(contact|inquiry|support|form|otoiawase|toiawase|contact-us|soudan|shiryou|oubo)(/|$)")
        .unwrap()
});

/// Email input markers inside a form.
pub static EMAIL_FIELD_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r#"(?i)type=["']email["']"#,
        r#"(?i)name=["'][^"']*email[^"']*["']"#,
        r#"(?i)id=["'][^"']*email[^"']*["']"#,
        r#"(?i)placeholder=["'][^"']*email[^"']*["']"#,
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect()
});

/// One taxonomy row: label plus its English and Japanese keyword sets.
/// Declaration order is the tie-break order for equal hit counts.
#[derive(Debug, Clone)]
pub struct IndustryEntry {
    pub label: &'static str,
    pub en: &'static [&'static str],
    pub ja: &'static [&'static str],
}

/// Bilingual industry taxonomy plus the schema.org type table. Injected
/// into the classifier so tests can swap taxonomies.
#[derive(Debug, Clone)]
pub struct Taxonomy {
    pub entries: Vec<IndustryEntry>,
    /// Lowercased schema.org @type to industry label; `None` marks types too
    /// generic to map (Organization, LocalBusiness).
    pub schema_types: Vec<(&'static str, Option<&'static str>)>,
}

impl Default for Taxonomy {
    fn default() -> Self {
        Self {
            entries: INDUSTRY_TAXONOMY.to_vec(),
            schema_types: SCHEMA_TYPE_MAPPING.to_vec(),
        }
    }
}

pub const INDUSTRY_TAXONOMY: &[IndustryEntry] = &[
    IndustryEntry {
        label: "technology",
        en: &[
            "IT",
            "software",
            "technology",
            "tech",
            "developer",
            "development",
            "ai",
            "artificial intelligence",
            "machine learning",
            "cloud",
            "saas",
            "web development",
            "app development",
            "programming",
            "system integration",
            "information technology",
            "digital",
            "cyber",
            "data science",
        ],
        ja: &[
            "IT",
            "情報技術",
            "ソフトウェア",
            "テクノロジー",
            "システム開発",
            "クラウド",
            "AI",
            "人工知能",
            "情報システム",
            "システムインテグレーション",
            "ウェブ開発",
            "アプリ開発",
            "プログラミング",
            "デジタル",
        ],
    },
    IndustryEntry {
        label: "finance",
        en: &[
            "finance",
            "financial",
            "banking",
            "bank",
            "insurance",
            "investment",
            "securities",
            "asset management",
            "mortgage",
            "credit",
            "fintech",
            "wealth management",
            "trading",
            "forex",
        ],
        ja: &[
            "金融",
            "銀行",
            "保険",
            "証券",
            "投資",
            "資産運用",
            "ファイナンス",
            "信用金庫",
            "信用組合",
            "証券会社",
            "ファイナンシャル",
        ],
    },
    IndustryEntry {
        label: "retail",
        en: &[
            "retail",
            "shop",
            "store",
            "ecommerce",
            "e-commerce",
            "online",
            "shopping",
            "merchandise",
            "commerce",
            "sales",
            "department store",
            "supermarket",
            "wholesale",
        ],
        ja: &[
            "小売",
            "ショップ",
            "店舗",
            "EC",
            "ECサイト",
            "オンラインショップ",
            "通販",
            "ネットショップ",
            "百貨店",
            "スーパー",
            "卸売",
        ],
    },
    IndustryEntry {
        label: "healthcare",
        en: &[
            "healthcare",
            "health",
            "medical",
            "medicine",
            "hospital",
            "clinic",
            "pharma",
            "pharmaceutical",
            "drug",
            "therapy",
            "wellness",
            "nursing",
            "dental",
            "diagnostic",
            "biotech",
        ],
        ja: &[
            "医療",
            "病院",
            "クリニック",
            "ヘルスケア",
            "製薬",
            "薬品",
            "医療機器",
            "診療所",
            "医院",
            "薬局",
            "歯科",
            "バイオテック",
        ],
    },
    IndustryEntry {
        label: "education",
        en: &[
            "education",
            "school",
            "university",
            "college",
            "training",
            "academy",
            "learning",
            "course",
            "tutor",
            "educational",
            "elearning",
            "online learning",
        ],
        ja: &[
            "教育",
            "学校",
            "大学",
            "学習",
            "トレーニング",
            "アカデミー",
            "スクール",
            "塾",
            "予備校",
            "専門学校",
            "オンライン学習",
        ],
    },
    IndustryEntry {
        label: "manufacturing",
        en: &[
            "manufacturing",
            "manufacturer",
            "factory",
            "production",
            "industrial",
            "maker",
            "fabrication",
            "assembly",
            "machinery",
        ],
        ja: &[
            "製造",
            "工場",
            "生産",
            "工業",
            "メーカー",
            "製造業",
            "生産管理",
            "工場管理",
            "部品製造",
        ],
    },
    IndustryEntry {
        label: "construction",
        en: &[
            "construction",
            "builder",
            "building",
            "civil engineering",
            "contractor",
            "engineering",
            "infrastructure",
            "development",
        ],
        ja: &[
            "建設",
            "建築",
            "工事",
            "土木",
            "エンジニアリング",
            "建築設計",
            "施工管理",
            "土木工事",
        ],
    },
    IndustryEntry {
        label: "real_estate",
        en: &[
            "real estate",
            "property",
            "realty",
            "housing",
            "apartment",
            "real-estate",
            "land",
            "rent",
            "rental",
            "real estate agent",
        ],
        ja: &[
            "不動産",
            "住宅",
            "マンション",
            "土地",
            "賃貸",
            "不動産管理",
            "宅地建物取引",
            "不動産仲介",
        ],
    },
    IndustryEntry {
        label: "food_beverage",
        en: &[
            "food",
            "beverage",
            "restaurant",
            "dining",
            "cafe",
            "café",
            "catering",
            "food service",
            "bakery",
            "food manufacturing",
            "restaurant group",
        ],
        ja: &[
            "食品",
            "レストラン",
            "飲食",
            "外食",
            "飲料",
            "フードサービス",
            "食品製造",
            "食品加工",
            "カフェ",
            "ベーカリー",
        ],
    },
    IndustryEntry {
        label: "automotive",
        en: &[
            "automotive",
            "automobile",
            "car",
            "vehicle",
            "auto",
            "mobility",
            "auto parts",
            "dealership",
            "fleet",
        ],
        ja: &[
            "自動車",
            "車",
            "カー",
            "モビリティ",
            "自動車関連",
            "自動車部品",
            "自動車販売",
            "自動車修理",
        ],
    },
    IndustryEntry {
        label: "energy",
        en: &[
            "energy",
            "power",
            "electric",
            "electricity",
            "renewable energy",
            "solar",
            "wind",
            "generation",
            "utility",
            "oil",
            "gas",
            "utility company",
        ],
        ja: &[
            "エネルギー",
            "電力",
            "電気",
            "再生可能エネルギー",
            "太陽光",
            "風力",
            "発電",
            "電力会社",
            "ガス",
        ],
    },
    IndustryEntry {
        label: "logistics",
        en: &[
            "logistics",
            "transportation",
            "shipping",
            "delivery",
            "supply chain",
            "transport",
            "warehouse",
            "distribution",
        ],
        ja: &[
            "物流",
            "運輸",
            "配送",
            "輸送",
            "サプライチェーン",
            "運送",
            "倉庫",
            "物流センター",
        ],
    },
    IndustryEntry {
        label: "consulting",
        en: &[
            "consulting",
            "consultant",
            "advisory",
            "advising",
            "management consulting",
            "business consultant",
            "strategy",
            "strategic",
        ],
        ja: &[
            "コンサルティング",
            "コンサル",
            "アドバイザリー",
            "経営コンサル",
            "経営相談",
            "コンサルタント",
        ],
    },
    IndustryEntry {
        label: "media",
        en: &[
            "media",
            "publishing",
            "broadcast",
            "entertainment",
            "advertising",
            "news",
            "television",
            "radio",
            "production",
        ],
        ja: &[
            "メディア",
            "出版",
            "放送",
            "エンターテインメント",
            "広告",
            "広告代理店",
            "テレビ",
            "ラジオ",
        ],
    },
    IndustryEntry {
        label: "telecommunications",
        en: &[
            "telecommunications",
            "telecom",
            "communication",
            "mobile",
            "wireless",
            "phone",
            "network",
            "internet service",
            "isp",
        ],
        ja: &[
            "通信",
            "テレコム",
            "モバイル",
            "無線",
            "通信事業",
            "通信会社",
            "携帯電話",
        ],
    },
    IndustryEntry {
        label: "hospitality",
        en: &[
            "hotel",
            "hospitality",
            "resort",
            "accommodation",
            "lodging",
            "tourism",
            "travel",
            "tour operator",
        ],
        ja: &[
            "ホテル",
            "ホスピタリティ",
            "リゾート",
            "宿泊",
            "観光",
            "旅行",
            "ツアーオペレーター",
        ],
    },
    IndustryEntry {
        label: "entertainment",
        en: &[
            "entertainment",
            "gaming",
            "game",
            "esports",
            "music",
            "movie",
            "film",
            "studio",
            "production",
        ],
        ja: &[
            "エンターテインメント",
            "ゲーム",
            "音楽",
            "映画",
            "スタジオ",
            "エスポーツ",
        ],
    },
    IndustryEntry {
        label: "non_profit",
        en: &[
            "non-profit",
            "nonprofit",
            "ngo",
            "charity",
            "charitable",
            "foundation",
            "association",
            "volunteer",
        ],
        ja: &["非営利", "npo", "ngo", "慈善", "チャリティ", "財団", "協会"],
    },
];

pub const SCHEMA_TYPE_MAPPING: &[(&str, Option<&str>)] = &[
    ("softwareapplication", Some("technology")),
    ("websiteapplication", Some("technology")),
    ("computersoftware", Some("technology")),
    ("financialservice", Some("finance")),
    ("bank", Some("finance")),
    ("insuranceagency", Some("finance")),
    ("investmentservice", Some("finance")),
    ("store", Some("retail")),
    ("onlinestore", Some("retail")),
    ("shoppingcenter", Some("retail")),
    ("hospital", Some("healthcare")),
    ("physicianoffice", Some("healthcare")),
    ("dentistoffice", Some("healthcare")),
    ("veterinarycare", Some("healthcare")),
    ("pharmacy", Some("healthcare")),
    ("educationalorganization", Some("education")),
    ("school", Some("education")),
    ("university", Some("education")),
    ("elementaryschool", Some("education")),
    ("middleschool", Some("education")),
    ("highschool", Some("education")),
    ("collegeoruniversity", Some("education")),
    ("manufacturer", Some("manufacturing")),
    ("contractorservice", Some("construction")),
    ("realestateagent", Some("real_estate")),
    ("residentialarea", Some("real_estate")),
    ("apartmentcomplex", Some("real_estate")),
    ("restaurant", Some("food_beverage")),
    ("cafe", Some("food_beverage")),
    ("bakery", Some("food_beverage")),
    ("foodestablishment", Some("food_beverage")),
    ("automobiledealership", Some("automotive")),
    ("automobilerepair", Some("automotive")),
    ("gasstation", Some("energy")),
    ("shippingservice", Some("logistics")),
    ("storageservice", Some("logistics")),
    ("professionalservice", Some("consulting")),
    ("hotel", Some("hospitality")),
    ("broadcaster", Some("media")),
    ("televisionstation", Some("media")),
    ("radiochannel", Some("media")),
    // Too generic to classify.
    ("localbusiness", None),
    ("organization", None),
];

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
