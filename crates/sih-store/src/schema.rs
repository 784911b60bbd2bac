//! Relational schema.
//!
//! Surrogate integer keys everywhere; admission FK columns are nullable
//! but the normalizer always resolves them (missing demographics map to a
//! placeholder-keyed entity), so dashboard joins are total.

pub const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS patients (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    composite_key TEXT NOT NULL,
    age INTEGER,
    sex_code TEXT,
    birth_date TEXT,
    municipality_code TEXT,
    postal_code TEXT,
    race_code TEXT,
    nationality_code TEXT
);
CREATE INDEX IF NOT EXISTS idx_patients_key ON patients(composite_key);
CREATE INDEX IF NOT EXISTS idx_patients_municipality ON patients(municipality_code);

CREATE TABLE IF NOT EXISTS establishments (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    composite_key TEXT NOT NULL,
    cnes TEXT,
    tax_id TEXT,
    parent_tax_id TEXT,
    municipality_code TEXT,
    specialty_code TEXT,
    legal_nature_code TEXT,
    management_code TEXT,
    complexity_code TEXT
);
CREATE INDEX IF NOT EXISTS idx_establishments_key ON establishments(composite_key);

CREATE TABLE IF NOT EXISTS admissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    aih_number TEXT,
    competence_year INTEGER,
    competence_month INTEGER,
    patient_id INTEGER,
    establishment_id INTEGER,
    principal_diagnosis TEXT,
    secondary_diagnosis TEXT,
    requested_procedure TEXT,
    performed_procedure TEXT,
    admission_character TEXT,
    financing_code TEXT,
    admission_date TEXT,
    discharge_date TEXT,
    stay_days INTEGER,
    icu_days INTEGER,
    icu_marker TEXT,
    risk_pregnancy TEXT,
    companion_days INTEGER,
    daily_count REAL,
    sequence_number INTEGER,
    batch_code TEXT,
    source_file TEXT,
    FOREIGN KEY(patient_id) REFERENCES patients(id),
    FOREIGN KEY(establishment_id) REFERENCES establishments(id)
);
CREATE INDEX IF NOT EXISTS idx_admissions_diagnosis ON admissions(principal_diagnosis);
CREATE INDEX IF NOT EXISTS idx_admissions_competence ON admissions(competence_year, competence_month);
CREATE INDEX IF NOT EXISTS idx_admissions_patient ON admissions(patient_id);
CREATE INDEX IF NOT EXISTS idx_admissions_date ON admissions(admission_date);

CREATE TABLE IF NOT EXISTS financial_values (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    admission_id INTEGER NOT NULL,
    hospital_services REAL NOT NULL DEFAULT 0,
    professional_services REAL NOT NULL DEFAULT 0,
    diagnostics REAL NOT NULL DEFAULT 0,
    diagnostics_no_split REAL NOT NULL DEFAULT 0,
    newborn REAL NOT NULL DEFAULT 0,
    companion REAL NOT NULL DEFAULT 0,
    prosthesis REAL NOT NULL DEFAULT 0,
    blood REAL NOT NULL DEFAULT 0,
    transport REAL NOT NULL DEFAULT 0,
    obstetric REAL NOT NULL DEFAULT 0,
    pediatric REAL NOT NULL DEFAULT 0,
    icu REAL NOT NULL DEFAULT 0,
    intermediate_care REAL NOT NULL DEFAULT 0,
    hospital_services_federal REAL NOT NULL DEFAULT 0,
    professional_services_federal REAL NOT NULL DEFAULT 0,
    hospital_services_manager REAL NOT NULL DEFAULT 0,
    professional_services_manager REAL NOT NULL DEFAULT 0,
    total REAL NOT NULL DEFAULT 0,
    foreign_currency_total REAL NOT NULL DEFAULT 0,
    FOREIGN KEY(admission_id) REFERENCES admissions(id)
);
CREATE INDEX IF NOT EXISTS idx_financial_admission ON financial_values(admission_id);

CREATE TABLE IF NOT EXISTS diagnoses (
    code TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    chapter TEXT,
    disease_group TEXT,
    primary_care_sensitive INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS municipalities (
    code TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    region TEXT
);

CREATE TABLE IF NOT EXISTS procedures (
    code TEXT PRIMARY KEY,
    description TEXT NOT NULL,
    procedure_group TEXT
);

CREATE TABLE IF NOT EXISTS establishment_names (
    tax_id TEXT PRIMARY KEY,
    legal_name TEXT NOT NULL,
    establishment_kind TEXT
);

CREATE TABLE IF NOT EXISTS sex_codes (
    code TEXT PRIMARY KEY,
    description TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS specialty_codes (
    code TEXT PRIMARY KEY,
    description TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS legal_nature_codes (
    code TEXT PRIMARY KEY,
    description TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS management_codes (
    code TEXT PRIMARY KEY,
    description TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS financing_codes (
    code TEXT PRIMARY KEY,
    description TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS admission_character_codes (
    code TEXT PRIMARY KEY,
    description TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS complexity_codes (
    code TEXT PRIMARY KEY,
    description TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS metadata (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    table_name TEXT NOT NULL UNIQUE,
    row_count INTEGER NOT NULL,
    source_path TEXT,
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
";

pub const DROP_TABLES: &str = "
DROP TABLE IF EXISTS financial_values;
DROP TABLE IF EXISTS admissions;
DROP TABLE IF EXISTS patients;
DROP TABLE IF EXISTS establishments;
DROP TABLE IF EXISTS diagnoses;
DROP TABLE IF EXISTS municipalities;
DROP TABLE IF EXISTS procedures;
DROP TABLE IF EXISTS establishment_names;
DROP TABLE IF EXISTS sex_codes;
DROP TABLE IF EXISTS specialty_codes;
DROP TABLE IF EXISTS legal_nature_codes;
DROP TABLE IF EXISTS management_codes;
DROP TABLE IF EXISTS financing_codes;
DROP TABLE IF EXISTS admission_character_codes;
DROP TABLE IF EXISTS complexity_codes;
DROP TABLE IF EXISTS metadata;
";

/// Small domain vocabularies seeded at schema creation. These never come
/// from an external service; the codes are defined by the SIH layout.
pub const SEED_CODES: &str = "
INSERT OR IGNORE INTO sex_codes (code, description) VALUES
    ('1', 'Masculino'),
    ('2', 'Feminino'),
    ('3', 'Feminino'),
    ('9', 'Ignorado');

INSERT OR IGNORE INTO admission_character_codes (code, description) VALUES
    ('01', 'Eletivo'),
    ('02', 'Urgência'),
    ('03', 'Acidente no local de trabalho'),
    ('04', 'Acidente no trajeto para o trabalho'),
    ('05', 'Outros tipos de acidente de trânsito'),
    ('06', 'Outros tipos de lesões por agentes externos');

INSERT OR IGNORE INTO complexity_codes (code, description) VALUES
    ('01', 'Atenção básica'),
    ('02', 'Média complexidade'),
    ('03', 'Alta complexidade');

INSERT OR IGNORE INTO financing_codes (code, description) VALUES
    ('01', 'Atenção básica (PAB)'),
    ('04', 'Fundo de Ações Estratégicas e Compensação (FAEC)'),
    ('05', 'Incentivo MAC'),
    ('06', 'Média e alta complexidade (MAC)');

INSERT OR IGNORE INTO management_codes (code, description) VALUES
    ('01', 'Gestão estadual'),
    ('02', 'Gestão municipal plena'),
    ('03', 'Gestão municipal');

INSERT OR IGNORE INTO specialty_codes (code, description) VALUES
    ('01', 'Cirurgia'),
    ('02', 'Obstetrícia'),
    ('03', 'Clínica médica'),
    ('04', 'Crônicos'),
    ('05', 'Psiquiatria'),
    ('06', 'Pneumologia sanitária'),
    ('07', 'Pediatria'),
    ('08', 'Reabilitação'),
    ('09', 'Hospital-dia cirúrgico'),
    ('10', 'Hospital-dia AIDS');

INSERT OR IGNORE INTO legal_nature_codes (code, description) VALUES
    ('1023', 'Órgão público do poder executivo estadual'),
    ('1244', 'Município'),
    ('2054', 'Sociedade anônima aberta'),
    ('3069', 'Fundação privada'),
    ('3999', 'Associação privada');
";
