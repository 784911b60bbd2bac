//! The fixed SIH/SUS RD column vocabulary.
//!
//! Column codes are defined by the source government system and arrive
//! upper-case in every monthly extract. Only the columns the pipeline
//! reads are named here; unrecognized columns flow through untouched.

pub const UF_ZI: &str = "UF_ZI";
pub const ANO_CMPT: &str = "ANO_CMPT";
pub const MES_CMPT: &str = "MES_CMPT";
pub const ESPEC: &str = "ESPEC";
pub const CGC_HOSP: &str = "CGC_HOSP";
pub const N_AIH: &str = "N_AIH";
pub const CEP: &str = "CEP";
pub const MUNIC_RES: &str = "MUNIC_RES";
pub const MUNIC_MOV: &str = "MUNIC_MOV";
pub const NASC: &str = "NASC";
pub const SEXO: &str = "SEXO";
pub const IDADE: &str = "IDADE";
pub const RACA_COR: &str = "RACA_COR";
pub const NACIONAL: &str = "NACIONAL";
pub const DIAG_PRINC: &str = "DIAG_PRINC";
pub const DIAGSEC1: &str = "DIAGSEC1";
pub const PROC_SOLIC: &str = "PROC_SOLIC";
pub const PROC_REA: &str = "PROC_REA";
pub const COMPLEX: &str = "COMPLEX";
pub const DT_INTER: &str = "DT_INTER";
pub const DT_SAIDA: &str = "DT_SAIDA";
pub const DIAS_PERM: &str = "DIAS_PERM";
pub const CAR_INT: &str = "CAR_INT";
pub const UTI_MES_TO: &str = "UTI_MES_TO";
pub const MARCA_UTI: &str = "MARCA_UTI";
pub const DIAR_ACOM: &str = "DIAR_ACOM";
pub const QT_DIARIAS: &str = "QT_DIARIAS";
pub const NAT_JUR: &str = "NAT_JUR";
pub const GESTAO: &str = "GESTAO";
pub const GESTRISCO: &str = "GESTRISCO";
pub const FINANC: &str = "FINANC";
pub const CNES: &str = "CNES";
pub const CNPJ_MANT: &str = "CNPJ_MANT";
pub const SEQUENCIA: &str = "SEQUENCIA";
pub const REMESSA: &str = "REMESSA";

pub const VAL_SH: &str = "VAL_SH";
pub const VAL_SP: &str = "VAL_SP";
pub const VAL_SADT: &str = "VAL_SADT";
pub const VAL_SADTSR: &str = "VAL_SADTSR";
pub const VAL_RN: &str = "VAL_RN";
pub const VAL_ACOMP: &str = "VAL_ACOMP";
pub const VAL_ORTP: &str = "VAL_ORTP";
pub const VAL_SANGUE: &str = "VAL_SANGUE";
pub const VAL_TRANSP: &str = "VAL_TRANSP";
pub const VAL_OBSANG: &str = "VAL_OBSANG";
pub const VAL_PED1AC: &str = "VAL_PED1AC";
pub const VAL_UTI: &str = "VAL_UTI";
pub const VAL_UCI: &str = "VAL_UCI";
pub const VAL_SH_FED: &str = "VAL_SH_FED";
pub const VAL_SP_FED: &str = "VAL_SP_FED";
pub const VAL_SH_GES: &str = "VAL_SH_GES";
pub const VAL_SP_GES: &str = "VAL_SP_GES";
pub const VAL_TOT: &str = "VAL_TOT";
pub const US_TOT: &str = "US_TOT";

/// Column added by the cleanser to tag each row with its source file.
pub const ARQUIVO_ORIGEM: &str = "ARQUIVO_ORIGEM";

/// Columns coerced to numbers during cleansing. Coercion failures become
/// null; a listed column absent from a given file is skipped.
pub const NUMERIC_COLUMNS: &[&str] = &[
    IDADE, DIAS_PERM, QT_DIARIAS, VAL_TOT, VAL_SH, VAL_SP, SEQUENCIA,
];

/// Columns coerced from 8-digit `YYYYMMDD` text to ISO dates during
/// cleansing.
pub const DATE_COLUMNS: &[&str] = &[DT_INTER, DT_SAIDA, NASC];
