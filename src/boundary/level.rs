#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AdmLevel {
    Adm1,       // Highest-level entity (state/province)
    Adm2,       // District -> Adm1
    Adm3,       // Sub-district -> Adm2
}

impl AdmLevel {
    pub fn to_str(&self) -> &'static str {
        match self {
            AdmLevel::Adm1 => "adm1",
            AdmLevel::Adm2 => "adm2",
            AdmLevel::Adm3 => "adm3",
        }
    }
}
