// src/vocabulary/builtin.rs - Curated vocabulary compiled into the crate

use std::collections::HashMap;

use super::{CanonicalEntry, DomainIndex, SeniorityPhrases, TitleVocabulary, VocabularyStore};

/// (canonical department, category, known variants)
pub const DEPARTMENTS: &[(&str, &str, &[&str])] = &[
    // Public Safety
    ("Police", "Public Safety", &["police department", "police dept", "police services", "department of police", "pd"]),
    ("Fire", "Public Safety", &["fire department", "fire dept", "fire rescue", "fire & rescue", "fire and rescue", "fire services"]),
    ("Sheriff", "Public Safety", &["sheriff's office", "sheriffs office", "sheriff department", "office of the sheriff"]),
    ("Emergency Management", "Public Safety", &["office of emergency management", "emergency services", "oem"]),
    ("Emergency Communications", "Public Safety", &["911", "e911", "dispatch", "911 communications", "communications center"]),
    ("Coroner", "Public Safety", &["medical examiner", "coroner's office"]),
    ("Public Safety", "Public Safety", &["department of public safety"]),
    // Courts & Legal
    ("City Attorney", "Courts & Legal", &["city attorney's office", "law department", "legal department", "legal"]),
    ("District Attorney", "Courts & Legal", &["district attorney's office", "prosecutor's office", "da office"]),
    ("Public Defender", "Courts & Legal", &["public defender's office"]),
    ("Municipal Court", "Courts & Legal", &["city court", "courts", "municipal courts"]),
    ("District Court", "Courts & Legal", &[]),
    ("Juvenile Court", "Courts & Legal", &["juvenile services"]),
    ("Clerk of Courts", "Courts & Legal", &["clerk of court", "court clerk"]),
    ("Probation", "Courts & Legal", &["probation department", "adult probation"]),
    // Administration
    ("Administration", "Administration", &["admin", "administrative services", "general administration"]),
    ("City Manager", "Administration", &["city manager's office", "office of the city manager", "town manager"]),
    ("Mayor's Office", "Administration", &["mayors office", "office of the mayor", "mayor"]),
    ("City Clerk", "Administration", &["city clerk's office", "clerk's office", "town clerk", "office of the city clerk"]),
    ("Human Resources", "Administration", &["human resources department", "personnel", "personnel department", "human resource services", "people operations"]),
    ("Superintendent", "Administration", &["superintendent's office", "office of the superintendent"]),
    ("City Council", "Administration", &["council", "town council", "board of aldermen", "city commission"]),
    // Finance
    ("Finance", "Finance", &["finance department", "financial services", "department of finance", "accounting"]),
    ("Budget", "Finance", &["budget office", "office of management and budget", "budget and management"]),
    ("Treasurer", "Finance", &["treasury", "treasurer's office", "revenue"]),
    ("Auditor", "Finance", &["auditor's office", "internal audit", "audit"]),
    ("Risk Management", "Finance", &["risk"]),
    ("Purchasing", "Finance", &["procurement", "purchasing department", "purchasing and contracts"]),
    // Infrastructure
    ("Public Works", "Infrastructure", &["public works department", "department of public works", "dept of public works", "dpw"]),
    ("Streets & Roads", "Infrastructure", &["streets", "street department", "roads", "road and bridge", "streets and roads"]),
    ("Water", "Infrastructure", &["water department", "water utilities", "water services"]),
    ("Wastewater", "Infrastructure", &["wastewater treatment", "sewer", "water reclamation"]),
    ("Utilities", "Infrastructure", &["utility services", "utilities department"]),
    ("Stormwater", "Infrastructure", &["storm water", "drainage"]),
    ("Solid Waste", "Infrastructure", &["sanitation", "refuse", "trash", "garbage", "recycling"]),
    ("Engineering", "Infrastructure", &["engineering department", "city engineer"]),
    ("Facilities Management", "Infrastructure", &["facilities", "facility maintenance", "building maintenance"]),
    ("Fleet Management", "Infrastructure", &["fleet", "fleet services", "vehicle maintenance", "garage"]),
    // Planning & Development
    ("Planning", "Planning & Development", &["planning department", "planning and zoning", "planning & zoning", "city planning"]),
    ("Community Development", "Planning & Development", &["economic development", "community and economic development", "housing"]),
    ("Building & Inspections", "Planning & Development", &["building inspections", "building department", "code enforcement", "inspections", "permits"]),
    ("Zoning", "Planning & Development", &["zoning department", "zoning administration"]),
    // Education
    ("Board of Education", "Education", &["school board", "board of trustees"]),
    ("Elementary School", "Education", &[]),
    ("Middle School", "Education", &["junior high"]),
    ("High School", "Education", &["senior high"]),
    ("Curriculum & Instruction", "Education", &["curriculum and instruction", "teaching and learning"]),
    ("Special Education", "Education", &["special ed", "exceptional student education", "sped"]),
    ("Student Services", "Education", &["pupil services"]),
    ("Food Service", "Education", &["food services", "nutrition services", "child nutrition", "cafeteria"]),
    // Parks & Recreation
    ("Parks & Recreation", "Parks & Recreation", &["parks and recreation", "parks & rec", "parks and rec", "recreation", "parks"]),
    ("Athletics", "Parks & Recreation", &["athletic department", "athletics department"]),
    ("Library", "Parks & Recreation", &["public library", "library services", "libraries"]),
    // Health & Human Services
    ("Health", "Health & Human Services", &["health department", "public health", "department of health"]),
    ("Human Services", "Health & Human Services", &["social services", "department of human services", "family services"]),
    ("Senior Services", "Health & Human Services", &["aging services", "council on aging", "senior center"]),
    ("Veterans Services", "Health & Human Services", &["veterans affairs", "veterans service office"]),
    // Other
    ("Assessor", "Other", &["assessor's office", "tax assessor", "property appraiser", "appraisal district"]),
    ("Elections", "Other", &["board of elections", "elections office", "voter registration", "registrar of voters"]),
    ("Communications", "Other", &["public information", "public information office", "communications office", "public affairs"]),
    ("Information Technology", "Other", &["information technology department", "information services", "technology services", "it department", "information systems"]),
    ("Airport", "Other", &["aviation", "airport authority"]),
    ("Animal Control", "Other", &["animal services", "animal shelter"]),
    ("Cemetery", "Other", &[]),
    ("Transportation Services", "Other", &["transportation", "transit", "transit authority", "public transportation"]),
];

/// Single leading-token abbreviations.
pub const DEPARTMENT_ABBREVIATIONS: &[(&str, &str)] = &[
    ("it", "Information Technology"),
    ("is", "Information Technology"),
    ("hr", "Human Resources"),
    ("pw", "Public Works"),
    ("dpw", "Public Works"),
    ("rec", "Parks & Recreation"),
    ("parks", "Parks & Recreation"),
    ("pd", "Police"),
    ("fd", "Fire"),
    ("em", "Emergency Management"),
    ("fin", "Finance"),
    ("eng", "Engineering"),
];

/// Whole-token keywords that bypass the cascade.
pub const DEPARTMENT_KEYWORDS: &[(&str, &str)] = &[
    ("sheriff", "Sheriff"),
    ("transit", "Transportation Services"),
];

/// (canonical title, known variants)
pub const CANONICAL_TITLES: &[(&str, &[&str])] = &[
    ("Accountant", &["staff accountant", "accountant i", "accountant ii"]),
    ("Administrative Assistant", &["admin assistant", "administrative asst", "office assistant", "admin asst"]),
    ("Animal Control Officer", &["animal control", "animal services officer"]),
    ("Assessor", &["tax assessor", "county assessor"]),
    ("Assistant City Manager", &["asst city manager", "assistant town manager"]),
    ("Assistant Principal", &["vice principal", "asst principal"]),
    ("Assistant Superintendent", &["asst superintendent", "deputy superintendent"]),
    ("Athletic Director", &["athletics director", "director of athletics"]),
    ("Auditor", &["internal auditor", "staff auditor"]),
    ("Budget Analyst", &["budget officer"]),
    ("Building Inspector", &["building official", "building code inspector"]),
    ("Chief Executive Officer", &["ceo"]),
    ("Chief Financial Officer", &["cfo"]),
    ("Chief Information Officer", &["cio"]),
    ("Chief Operating Officer", &["coo"]),
    ("Chief Technology Officer", &["cto"]),
    ("City Attorney", &["town attorney", "municipal attorney"]),
    ("City Clerk", &["town clerk", "municipal clerk"]),
    ("City Engineer", &["town engineer", "county engineer"]),
    ("City Manager", &["town manager", "county manager", "city administrator", "town administrator"]),
    ("Civil Engineer", &["staff engineer", "project engineer"]),
    ("Code Enforcement Officer", &["code enforcement inspector", "code officer"]),
    ("Communications Director", &["director of communications", "communications manager"]),
    ("Council Member", &["councilmember", "councilman", "councilwoman", "city council member", "alderman", "commissioner"]),
    ("Court Clerk", &["deputy court clerk", "clerk of court"]),
    ("Custodian", &["janitor", "building custodian"]),
    ("Database Administrator", &["dba"]),
    ("Deputy City Manager", &["deputy town manager"]),
    ("Deputy Sheriff", &["sheriff's deputy", "sheriffs deputy"]),
    ("Detective", &["police detective", "investigator"]),
    ("Dispatcher", &["911 dispatcher", "emergency dispatcher", "public safety dispatcher", "telecommunicator"]),
    ("District Attorney", &["county attorney", "prosecuting attorney"]),
    ("Economic Development Director", &["director of economic development"]),
    ("Electrician", &["maintenance electrician"]),
    ("Emergency Management Coordinator", &["emergency manager", "emergency management specialist"]),
    ("Engineering Technician", &["engineering tech"]),
    ("Equipment Operator", &["heavy equipment operator"]),
    ("Executive Assistant", &["executive secretary", "executive admin"]),
    ("Executive Director", &["exec director"]),
    ("Finance Director", &["director of finance", "finance manager", "director of financial services"]),
    ("Financial Analyst", &["finance analyst"]),
    ("Fire Captain", &["captain fire"]),
    ("Fire Chief", &["chief of fire", "fire department chief", "chief of the fire department"]),
    ("Fire Marshal", &["fire inspector"]),
    ("Firefighter", &["fire fighter", "firefighter emt", "firefighter paramedic"]),
    ("Fleet Manager", &["fleet supervisor", "fleet services manager"]),
    ("Facilities Manager", &["facility manager", "facilities director", "director of facilities"]),
    ("GIS Analyst", &["gis specialist", "gis technician"]),
    ("Health Director", &["director of health", "public health director", "health officer"]),
    ("Help Desk Technician", &["help desk", "service desk technician", "it support technician"]),
    ("Human Resources Director", &["hr director", "director of human resources", "personnel director"]),
    ("Human Resources Specialist", &["hr specialist", "hr generalist", "human resources generalist"]),
    ("Information Technology Director", &["it director", "director of information technology", "technology director"]),
    ("Judge", &["municipal judge", "magistrate"]),
    ("Librarian", &["reference librarian", "children's librarian"]),
    ("Library Director", &["director of libraries", "head librarian"]),
    ("Maintenance Worker", &["maintenance technician", "maintenance tech"]),
    ("Mayor", &["town mayor", "city mayor"]),
    ("Mechanic", &["fleet mechanic", "equipment mechanic", "auto mechanic"]),
    ("Network Administrator", &["network admin", "network engineer"]),
    ("Nurse", &["registered nurse", "rn", "school nurse", "public health nurse"]),
    ("Office Manager", &["office supervisor"]),
    ("Paralegal", &["legal assistant"]),
    ("Parks Director", &["director of parks", "parks and recreation director", "director of parks and recreation"]),
    ("Payroll Specialist", &["payroll clerk", "payroll coordinator"]),
    ("Planner", &["city planner", "associate planner", "senior planner"]),
    ("Planning Director", &["director of planning", "planning manager"]),
    ("Police Captain", &["captain police"]),
    ("Police Chief", &["chief of police", "police department chief"]),
    ("Police Lieutenant", &["lieutenant police"]),
    ("Police Officer", &["patrol officer", "peace officer", "officer police"]),
    ("Police Sergeant", &["sergeant police"]),
    ("Principal", &["school principal", "head of school"]),
    ("Probation Officer", &["juvenile probation officer"]),
    ("Procurement Officer", &["purchasing agent", "buyer", "purchasing manager"]),
    ("Program Manager", &["program director"]),
    ("Project Manager", &["project coordinator"]),
    ("Public Information Officer", &["pio", "public affairs officer"]),
    ("Public Works Director", &["director of public works", "public works manager", "public works superintendent"]),
    ("Receptionist", &["front desk", "front desk clerk"]),
    ("Recreation Coordinator", &["recreation program coordinator"]),
    ("Recreation Supervisor", &["recreation manager"]),
    ("Secretary", &["department secretary"]),
    ("Sheriff", &["county sheriff", "high sheriff"]),
    ("Social Worker", &["caseworker", "case worker", "msw"]),
    ("Software Developer", &["sw developer", "sw dev", "software dev", "application developer"]),
    ("Software Engineer", &["sw engineer", "software eng"]),
    ("Superintendent", &["superintendent of schools", "school superintendent"]),
    ("Systems Administrator", &["sysadmin", "system administrator", "systems admin"]),
    ("Teacher", &["classroom teacher", "instructor", "educator"]),
    ("Treasurer", &["city treasurer", "county treasurer"]),
    ("Utility Worker", &["utility technician", "utilities worker"]),
    ("Wastewater Treatment Operator", &["wastewater operator", "wwtp operator"]),
    ("Water Plant Operator", &["water treatment operator", "water operator"]),
    ("Web Developer", &["web dev", "web programmer", "front end developer"]),
];

/// Real-world job titles seen in public-sector contact data.
pub const JOB_TITLES: &[&str] = &[
    "Accounts Payable Clerk", "Accounts Payable Specialist", "Accountant", "Administrative Assistant",
    "Administrative Services Manager", "Airport Manager", "Animal Control Officer", "Appraiser",
    "Assistant Chief of Police", "Assistant City Attorney", "Assistant City Manager", "Assistant Director",
    "Assistant District Attorney", "Assistant Fire Chief", "Assistant Principal", "Assistant Superintendent",
    "Athletic Director", "Auditor", "Battalion Chief", "Benefits Coordinator", "Budget Analyst",
    "Budget Manager", "Building Inspector", "Building Official", "Bus Operator", "Case Manager",
    "Chief Deputy", "Chief Executive Officer", "Chief Financial Officer", "Chief Information Officer",
    "Chief of Police", "Chief Operating Officer", "Chief Technology Officer", "City Attorney", "City Clerk",
    "City Engineer", "City Manager", "Civil Engineer", "Code Enforcement Officer", "Communications Director",
    "Communications Specialist", "Council Member", "County Administrator", "Court Administrator",
    "Court Clerk", "Crime Analyst", "Custodian", "Cybersecurity Analyst", "Data Analyst", "Data Engineer",
    "Data Scientist", "Database Administrator", "Deputy City Clerk",
    "Deputy City Manager", "Deputy Director", "Deputy Mayor", "Deputy Sheriff", "Detective",
    "Director of Finance", "Director of Public Works", "Dispatcher", "District Attorney",
    "Economic Development Director", "Electrician", "Elementary Teacher", "Elections Administrator",
    "Emergency Management Coordinator", "Emergency Management Director", "Engineering Technician",
    "Equipment Operator", "Event Coordinator", "Executive Assistant", "Executive Director",
    "Facilities Manager", "Finance Director", "Financial Analyst", "Fire Captain", "Fire Chief",
    "Fire Lieutenant", "Fire Marshal", "Firefighter", "Fleet Manager", "GIS Analyst", "GIS Coordinator",
    "Grants Coordinator", "Health Director", "Help Desk Specialist", "Help Desk Technician", "High School Teacher",
    "Housing Coordinator", "Human Resources Director", "Human Resources Generalist",
    "Human Resources Specialist", "Information Technology Director", "Internal Auditor", "IT Director",
    "IT Manager", "IT Specialist", "IT Technician", "Judge", "Legal Assistant", "Librarian",
    "Library Assistant", "Library Director", "Maintenance Worker",
    "Marketing Coordinator", "Mayor", "Mechanic", "Network Administrator", "Network Engineer", "Office Manager",
    "Operations Manager", "Paralegal", "Paramedic", "Parks Director", "Parks Superintendent",
    "Patrol Officer", "Payroll Specialist", "Planner", "Planning Director", "Police Captain", "Police Chief",
    "Police Lieutenant", "Police Officer", "Police Sergeant", "Principal", "Probation Officer",
    "Procurement Officer", "Program Coordinator", "Program Manager", "Project Manager",
    "Public Defender", "Public Health Nurse", "Public Information Officer", "Public Works Director",
    "Purchasing Agent", "Receptionist", "Recreation Coordinator", "Recreation Director",
    "Recreation Supervisor", "Recruiter", "Registered Nurse", "Risk Manager", "School Counselor",
    "School Nurse", "Secretary", "Senior Accountant", "Senior Center Director", "Senior Planner",
    "Sheriff", "Social Worker", "Software Developer", "Software Engineer", "Special Education Teacher",
    "Substitute Teacher", "Superintendent", "Systems Administrator", "Systems Analyst", "Teacher",
    "Town Clerk", "Traffic Engineer", "Transit Director", "Treasurer", "Undersheriff", "Utility Worker",
    "Veterans Service Officer", "Volunteer Coordinator", "Wastewater Treatment Operator",
    "Water Plant Operator", "Web Developer", "Zoning Administrator",
];

/// Official occupational classification titles.
pub const OFFICIAL_TITLES: &[&str] = &[
    "Accountants and Auditors", "Administrative Services Managers", "Budget Analysts",
    "Bus Drivers, Transit and Intercity", "Chief Executives", "Civil Engineers",
    "Compliance Officers", "Computer and Information Systems Managers", "Computer Systems Analysts",
    "Construction and Building Inspectors", "Correctional Officers and Jailers", "Court, Municipal, and License Clerks",
    "Database Administrators", "Detectives and Criminal Investigators", "Elementary School Teachers",
    "Emergency Management Directors", "Emergency Medical Technicians", "Financial Managers",
    "Fire Inspectors and Investigators", "Firefighters", "First-Line Supervisors of Firefighting and Prevention Workers",
    "First-Line Supervisors of Police and Detectives", "General and Operations Managers",
    "Human Resources Managers", "Human Resources Specialists", "Janitors and Cleaners", "Judges and Magistrates",
    "Lawyers", "Legislators", "Librarians and Media Collections Specialists", "Network and Computer Systems Administrators",
    "Paralegals and Legal Assistants", "Police and Sheriff's Patrol Officers", "Probation Officers and Correctional Treatment Specialists",
    "Public Relations Specialists", "Purchasing Agents", "Receptionists and Information Clerks", "Registered Nurses",
    "Secondary School Teachers", "Social and Community Service Managers", "Software Developers",
    "Urban and Regional Planners", "Water and Wastewater Treatment Plant and System Operators",
];

/// (token, domain tag). NULL marks tokens that must not vote.
pub const SEMANTIC_TOKENS: &[(&str, &str)] = &[
    // IT
    ("software", "IT"), ("programmer", "IT"), ("web", "IT"), ("network", "IT"),
    ("computer", "IT"), ("it", "IT"), ("technology", "IT"), ("database", "IT"), ("cyber", "IT"),
    ("gis", "IT"), ("helpdesk", "IT"), ("sysadmin", "IT"), ("data", "IT"),
    // INFRA
    ("water", "INFRA"), ("wastewater", "INFRA"), ("sewer", "INFRA"), ("stormwater", "INFRA"),
    ("streets", "INFRA"), ("roads", "INFRA"), ("mechanic", "INFRA"), ("infrastructure", "INFRA"),
    ("utilities", "INFRA"), ("utility", "INFRA"), ("fleet", "INFRA"), ("plumber", "INFRA"),
    ("electrician", "INFRA"), ("sanitation", "INFRA"), ("engineering", "INFRA"),
    // HEALTH
    ("nurse", "HEALTH"), ("health", "HEALTH"), ("medical", "HEALTH"), ("clinic", "HEALTH"),
    ("physician", "HEALTH"), ("nursing", "HEALTH"), ("coroner", "HEALTH"),
    // EDU
    ("teacher", "EDU"), ("school", "EDU"), ("education", "EDU"), ("curriculum", "EDU"),
    ("student", "EDU"), ("students", "EDU"), ("instruction", "EDU"), ("classroom", "EDU"),
    // SAFETY
    ("police", "SAFETY"), ("fire", "SAFETY"), ("sheriff", "SAFETY"), ("firefighter", "SAFETY"),
    ("patrol", "SAFETY"), ("detective", "SAFETY"), ("dispatch", "SAFETY"), ("dispatcher", "SAFETY"),
    ("emergency", "SAFETY"), ("paramedic", "SAFETY"), ("rescue", "SAFETY"),
    // FINANCE
    ("finance", "FINANCE"), ("budget", "FINANCE"), ("accounting", "FINANCE"), ("accountant", "FINANCE"),
    ("treasurer", "FINANCE"), ("payroll", "FINANCE"), ("tax", "FINANCE"), ("auditor", "FINANCE"),
    ("purchasing", "FINANCE"), ("procurement", "FINANCE"),
    // LEGAL
    ("attorney", "LEGAL"), ("legal", "LEGAL"), ("court", "LEGAL"), ("judge", "LEGAL"),
    ("paralegal", "LEGAL"), ("prosecutor", "LEGAL"), ("probation", "LEGAL"),
    // PARKS
    ("parks", "PARKS"), ("recreation", "PARKS"), ("athletics", "PARKS"), ("athletic", "PARKS"),
    // HR
    ("hr", "HR"), ("personnel", "HR"), ("recruiter", "HR"), ("recruiting", "HR"), ("benefits", "HR"),
    // PLANNING
    ("planning", "PLANNING"), ("planner", "PLANNING"), ("zoning", "PLANNING"),
    // Generic words vote for nothing
    ("manager", "NULL"), ("director", "NULL"), ("officer", "NULL"), ("supervisor", "NULL"),
    ("coordinator", "NULL"), ("specialist", "NULL"), ("assistant", "NULL"), ("administrator", "NULL"),
    ("senior", "NULL"), ("chief", "NULL"), ("head", "NULL"), ("lead", "NULL"), ("department", "NULL"),
    ("dept", "NULL"), ("office", "NULL"), ("division", "NULL"), ("services", "NULL"), ("city", "NULL"),
    ("county", "NULL"), ("of", "NULL"), ("and", "NULL"), ("the", "NULL"),
];

/// (phrase, seniority label)
pub const SENIORITY_PHRASES: &[(&str, &str)] = &[
    ("chief executive officer", "C-Suite"),
    ("chief operating officer", "C-Suite"),
    ("chief financial officer", "C-Suite"),
    ("chief information officer", "C-Suite"),
    ("chief technology officer", "C-Suite"),
    ("executive vice president", "Vice President"),
    ("senior vice president", "Vice President"),
    ("assistant vice president", "Vice President"),
    ("vice president", "Vice President"),
    ("executive director", "Director"),
    ("managing director", "Director"),
    ("senior director", "Director"),
    ("assistant director", "Assistant"),
    ("assistant manager", "Assistant"),
    ("associate director", "Associate"),
    ("deputy director", "Deputy"),
    ("team lead", "Lead"),
    ("entry level", "Entry"),
    ("ceo", "C-Suite"),
    ("cfo", "C-Suite"),
    ("coo", "C-Suite"),
    ("cio", "C-Suite"),
    ("cto", "C-Suite"),
    ("chief", "Chief"),
    ("principal", "Principal"),
    ("head", "Head"),
    ("director", "Director"),
    ("senior", "Senior"),
    ("sr", "Senior"),
    ("lead", "Lead"),
    ("executive", "Executive"),
    ("deputy", "Deputy"),
    ("junior", "Junior"),
    ("jr", "Junior"),
];

/// Department keywords that unlock a multi-word expansion of a generic title.
pub const CONTEXT_EXPANSIONS: &[(&str, &str, &[&str])] = &[
    ("coordinator", "Recreation Coordinator", &["recreation", "parks"]),
    ("coordinator", "Emergency Management Coordinator", &["emergency"]),
    ("coordinator", "Payroll Specialist", &["payroll"]),
    ("inspector", "Building Inspector", &["building", "inspections", "code"]),
    ("inspector", "Fire Marshal", &["fire"]),
    ("technician", "Engineering Technician", &["engineering"]),
    ("technician", "Help Desk Technician", &["information technology", "technology"]),
    ("specialist", "Human Resources Specialist", &["human resources", "personnel"]),
    ("operator", "Water Plant Operator", &["water"]),
    ("operator", "Wastewater Treatment Operator", &["wastewater", "sewer"]),
];

fn owned_pairs(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect()
}

pub fn department_vocabulary() -> VocabularyStore {
    let entries = DEPARTMENTS
        .iter()
        .map(|(label, category, variants)| CanonicalEntry::new(label, Some(*category), variants))
        .collect();
    VocabularyStore::from_parts(
        entries,
        owned_pairs(DEPARTMENT_ABBREVIATIONS),
        owned_pairs(DEPARTMENT_KEYWORDS),
    )
}

pub fn title_vocabulary() -> TitleVocabulary {
    let entries = CANONICAL_TITLES
        .iter()
        .map(|(label, variants)| CanonicalEntry::new(label, None, variants))
        .collect();
    TitleVocabulary::new(
        VocabularyStore::from_parts(entries, Vec::new(), Vec::new()),
        JOB_TITLES.iter().map(|t| t.to_string()).collect(),
        OFFICIAL_TITLES.iter().map(|t| t.to_string()).collect(),
    )
}

pub fn domain_index() -> DomainIndex {
    let tokens: HashMap<String, String> = owned_pairs(SEMANTIC_TOKENS).into_iter().collect();
    DomainIndex::new(tokens)
}

pub fn seniority_phrases() -> SeniorityPhrases {
    SeniorityPhrases::new(owned_pairs(SENIORITY_PHRASES))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_department_has_a_category() {
        let store = department_vocabulary();
        assert_eq!(store.len(), DEPARTMENTS.len());
        for label in store.labels() {
            assert!(store.category(label).is_some(), "{} has no category", label);
        }
    }

    #[test]
    fn test_shortcuts_point_at_canonicals() {
        let store = department_vocabulary();
        for (abbr, canonical) in DEPARTMENT_ABBREVIATIONS {
            assert_eq!(store.abbreviation(abbr), Some(*canonical));
        }
        assert_eq!(store.keyword_shortcut("Sheriff's Office"), Some("Sheriff"));
    }

    #[test]
    fn test_expansion_targets_are_canonical_titles() {
        let titles = title_vocabulary();
        for (_, target, _) in CONTEXT_EXPANSIONS {
            assert!(titles.canonicals.is_canonical(target), "{} is not canonical", target);
        }
    }

    #[test]
    fn test_generic_words_are_not_job_titles() {
        let titles = title_vocabulary();
        for generic in ["Coordinator", "Manager", "Director", "Specialist", "Inspector"] {
            assert!(titles.exact_job_title(generic).is_none());
            assert!(!titles.canonicals.is_canonical(generic));
        }
    }
}
