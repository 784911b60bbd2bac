//! Curated fallback tables.
//!
//! Hand-maintained maps of the codes that dominate the Paraná extract,
//! used when the authoritative files are unavailable and before any
//! external service is consulted.

/// Known IBGE municipality codes: (code, name, state).
pub const MUNICIPALITIES: &[(&str, &str, &str)] = &[
    ("4106902", "Curitiba", "PR"),
    ("4113700", "Londrina", "PR"),
    ("4115200", "Maringá", "PR"),
    ("4119905", "Ponta Grossa", "PR"),
    ("4104808", "Cascavel", "PR"),
    ("4118006", "Paranaguá", "PR"),
    ("4127502", "Toledo", "PR"),
    ("4108304", "Foz do Iguaçu", "PR"),
    ("4109500", "Guarapuava", "PR"),
    ("4101408", "Apucarana", "PR"),
    ("4104303", "Campo Mourão", "PR"),
    ("4128104", "Umuarama", "PR"),
    ("4118204", "Paranavaí", "PR"),
    ("4126207", "Sarandi", "PR"),
    ("4102307", "Almirante Tamandaré", "PR"),
    ("4104204", "Campo Largo", "PR"),
    ("4105805", "Colombo", "PR"),
    ("4119004", "Pinhais", "PR"),
    ("4125456", "São José dos Pinhais", "PR"),
    ("4101804", "Araucária", "PR"),
    ("4118402", "Pato Branco", "PR"),
    ("4108502", "Francisco Beltrão", "PR"),
    ("4128203", "União da Vitória", "PR"),
    ("4126900", "Telêmaco Borba", "PR"),
    ("4101507", "Arapongas", "PR"),
];

/// Known hospital CNPJs: (tax id, legal name, kind).
pub const ESTABLISHMENTS: &[(&str, &str, &str)] = &[
    (
        "78143153000185",
        "Hospital das Clínicas da UFPR",
        "Hospital Universitário",
    ),
    (
        "76416866003670",
        "Hospital Universitário Evangélico Mackenzie",
        "Hospital Universitário",
    ),
    (
        "75403287000108",
        "Santa Casa de Misericórdia de Curitiba",
        "Santa Casa",
    ),
    ("80759111000115", "Hospital São Vicente", "Hospital Privado"),
    (
        "78897519000101",
        "Hospital Erasto Gaertner",
        "Hospital Oncológico",
    ),
    (
        "75802348000100",
        "Hospital Nossa Senhora das Graças",
        "Hospital Privado",
    ),
    (
        "80860273000145",
        "Hospital Universitário Regional de Maringá",
        "Hospital Universitário",
    ),
    (
        "07070735000130",
        "Hospital Municipal de Curitiba",
        "Hospital Municipal",
    ),
    (
        "07088017000191",
        "UPA Cidade Industrial de Curitiba",
        "UPA",
    ),
    (
        "00000000000000",
        "Estabelecimento Não Identificado",
        "Não Identificado",
    ),
];

/// Known SUS procedure codes: (code, description, group).
pub const PROCEDURES: &[(&str, &str, &str)] = &[
    ("0301060088", "Consulta médica em atenção básica", "Consultas"),
    (
        "0303140151",
        "Atendimento de urgência em clínica médica",
        "Urgência",
    ),
    ("0310010039", "Parto normal", "Obstetrícia"),
    (
        "0303010037",
        "Atendimento médico em clínica básica",
        "Consultas",
    ),
    ("0411010034", "Cirurgia de catarata", "Cirurgia Oftalmológica"),
    ("0415020034", "Procedimento ortopédico", "Ortopedia"),
    ("0303070102", "Atendimento em pediatria", "Pediatria"),
    ("0303060212", "Consulta em cardiologia", "Cardiologia"),
    ("0303170190", "Atendimento neurológico", "Neurologia"),
    (
        "0415010012",
        "Cirurgia geral de pequeno porte",
        "Cirurgia Geral",
    ),
    ("0304080020", "Exame laboratorial básico", "Exames"),
    ("0303100044", "Atendimento ginecológico", "Ginecologia"),
    ("0404010032", "Fisioterapia motora", "Fisioterapia"),
    ("0304100021", "Exame de imagem", "Diagnóstico por Imagem"),
    (
        "0303140046",
        "Atendimento clínico hospitalar",
        "Internação",
    ),
    ("0407040102", "Psicoterapia individual", "Saúde Mental"),
    ("0209040033", "Quimioterapia", "Oncologia"),
    ("0211050091", "Radioterapia", "Oncologia"),
];

pub fn municipality(code: &str) -> Option<(&'static str, &'static str)> {
    MUNICIPALITIES
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, name, state)| (*name, *state))
}

pub fn establishment(tax_id: &str) -> Option<(&'static str, &'static str)> {
    ESTABLISHMENTS
        .iter()
        .find(|(known, _, _)| *known == tax_id)
        .map(|(_, name, kind)| (*name, *kind))
}

pub fn procedure(code: &str) -> Option<(&'static str, &'static str)> {
    PROCEDURES
        .iter()
        .find(|(known, _, _)| *known == code)
        .map(|(_, description, group)| (*description, *group))
}
