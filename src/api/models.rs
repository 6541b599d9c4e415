use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Custom deserializer: treats an explicit `null` like a missing field
fn deserialize_null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Custom deserializer: accepts strings and numbers, maps empty/null to None
fn deserialize_lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) if s.is_empty() => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        Value::Bool(b) => Ok(Some(b.to_string())),
        _ => Ok(None),
    }
}

/// `{id, name}` reference used for every hardware attribute
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct NamedRef {
    #[serde(default)]
    pub id: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Department {
    pub id: u32,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Section {
    #[serde(default)]
    pub id: u32,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub name: String,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub raw_name: String,
}

/// One inventory record. Wire names are kept as the server spells them.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Computer {
    pub slug: String,
    #[serde(rename = "departament", default)]
    pub department: Option<NamedRef>,
    #[serde(default)]
    pub section: Option<Section>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub user: Option<String>,
    #[serde(rename = "type_compyuter", default)]
    pub hardware_type: Option<NamedRef>,
    #[serde(rename = "ipadresss", default, deserialize_with = "deserialize_lenient_string")]
    pub ip_address: Option<String>,
    #[serde(rename = "mac_adress", default, deserialize_with = "deserialize_lenient_string")]
    pub mac_address: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub seal_number: Option<String>,
    #[serde(default)]
    pub warehouse_manager: Option<NamedRef>,
    #[serde(default)]
    pub motherboard: Option<NamedRef>,
    #[serde(default)]
    pub motherboard_model: Option<NamedRef>,
    #[serde(rename = "CPU", default)]
    pub cpu: Option<NamedRef>,
    #[serde(default)]
    pub generation: Option<NamedRef>,
    #[serde(default)]
    pub frequency: Option<NamedRef>,
    #[serde(rename = "HDD", default)]
    pub hdd: Option<NamedRef>,
    #[serde(rename = "SSD", default)]
    pub ssd: Option<NamedRef>,
    #[serde(default)]
    pub disk_type: Option<NamedRef>,
    #[serde(rename = "RAM_type", default)]
    pub ram_type: Option<NamedRef>,
    #[serde(rename = "RAMSize", default)]
    pub ram_size: Option<NamedRef>,
    #[serde(rename = "GPU", default)]
    pub gpu: Option<NamedRef>,
    #[serde(rename = "OS", default, deserialize_with = "deserialize_lenient_string")]
    pub os: Option<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub internet: bool,
    #[serde(rename = "isActive", default, deserialize_with = "deserialize_null_default")]
    pub is_active: bool,
    #[serde(rename = "joinDate", default, deserialize_with = "deserialize_lenient_string")]
    pub join_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub history_date: Option<String>,
    #[serde(default, deserialize_with = "deserialize_lenient_string")]
    pub history_user: Option<String>,
    #[serde(rename = "printer", default, deserialize_with = "deserialize_null_default")]
    pub printers: Vec<NamedRef>,
    #[serde(rename = "scaner", default, deserialize_with = "deserialize_null_default")]
    pub scanners: Vec<NamedRef>,
    #[serde(rename = "mfo", default, deserialize_with = "deserialize_null_default")]
    pub mfps: Vec<NamedRef>,
    #[serde(rename = "type_webcamera", default, deserialize_with = "deserialize_null_default")]
    pub webcam_types: Vec<NamedRef>,
    #[serde(rename = "model_webcam", default, deserialize_with = "deserialize_null_default")]
    pub webcam_models: Vec<NamedRef>,
    #[serde(rename = "type_monitor", default, deserialize_with = "deserialize_null_default")]
    pub monitor_types: Vec<NamedRef>,
}

impl Computer {
    /// Department name, treating an empty name as absent
    pub fn department_name(&self) -> Option<&str> {
        self.department
            .as_ref()
            .map(|d| d.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn section_name(&self) -> Option<&str> {
        self.section
            .as_ref()
            .map(|s| s.name.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn hardware_type_name(&self) -> Option<&str> {
        self.hardware_type
            .as_ref()
            .map(|t| t.name.as_str())
            .filter(|name| !name.is_empty())
    }
}

/// Paginated listing response of `GET /all_compyuters/`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct ComputerPage {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub results: Vec<Computer>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub count: u64,
}

/// Option catalog of `GET /filter-options/`
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct FilterOptions {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub departments: Vec<Department>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub sections: Vec<Section>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub ip_addresses: Vec<String>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub type_compyuters: Vec<NamedRef>,
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub users: Vec<String>,
}

impl FilterOptions {
    /// Resolve a department id by exact name
    pub fn department_id(&self, name: &str) -> Option<u32> {
        self.departments
            .iter()
            .find(|d| d.name == name)
            .map(|d| d.id)
    }
}

/// Response of `GET /all_texnology/?departament=<id>`
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct SectionsResponse {
    #[serde(default, deserialize_with = "deserialize_null_default")]
    pub section: Vec<Section>,
}

/// Body of `POST /filter-data/`
#[derive(Debug, Serialize, Clone)]
pub struct StatisticRequest {
    pub key: String,
}

/// Statistic card counts of `GET /info-comp/`
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
#[serde(default)]
pub struct InventorySummary {
    pub all_compyuters_count: u64,
    pub all_worked_compyuters_count: u64,
    pub all_noworked_compyuters_count: u64,
    pub all_compyuters_with_net: u64,
    pub all_compyuters_with_no_net: u64,
    pub all_compyuters_with_webcam: u64,
    pub all_compyuters_with_printer: u64,
    pub all_compyuters_with_scaner: u64,
    pub all_compyuters_with_mfo: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_computer_deserialization_with_wire_names() {
        let json = r#"{
            "slug": "pc-17",
            "departament": {"id": 3, "name": "2-цех"},
            "section": {"id": 9, "name": "ОТК", "raw_name": "ОТК (2-цех)"},
            "user": "Иванов",
            "type_compyuter": {"id": 1, "name": "Компьютер"},
            "ipadresss": "10.0.0.17",
            "mac_adress": "AA:BB:CC:DD:EE:FF",
            "seal_number": 10452,
            "CPU": {"id": 4, "name": "Intel i5"},
            "RAMSize": {"id": 2, "name": "8 GB"},
            "OS": "Windows 10",
            "internet": true,
            "isActive": false,
            "history_date": "2024-03-05T10:12:00Z",
            "history_user": "admin",
            "printer": [{"id": 1, "name": "HP 1020"}],
            "type_monitor": null
        }"#;

        let computer: Computer = serde_json::from_str(json).unwrap();
        assert_eq!(computer.slug, "pc-17");
        assert_eq!(computer.department_name(), Some("2-цех"));
        assert_eq!(computer.section.as_ref().unwrap().raw_name, "ОТК (2-цех)");
        assert_eq!(computer.hardware_type_name(), Some("Компьютер"));
        assert_eq!(computer.ip_address.as_deref(), Some("10.0.0.17"));
        assert_eq!(computer.seal_number.as_deref(), Some("10452"));
        assert_eq!(computer.cpu.as_ref().unwrap().name, "Intel i5");
        assert!(computer.internet);
        assert!(!computer.is_active);
        assert_eq!(computer.printers.len(), 1);
        assert!(computer.monitor_types.is_empty());
    }

    #[test]
    fn test_computer_with_null_fields() {
        let json = r#"{
            "slug": "pc-1",
            "departament": null,
            "user": null,
            "internet": null,
            "isActive": null,
            "printer": null
        }"#;

        let computer: Computer = serde_json::from_str(json).unwrap();
        assert!(computer.department_name().is_none());
        assert!(computer.user.is_none());
        assert!(!computer.internet);
        assert!(computer.printers.is_empty());
    }

    #[test]
    fn test_empty_department_name_is_absent() {
        let computer = Computer {
            slug: "x".to_string(),
            department: Some(NamedRef {
                id: Some(1),
                name: String::new(),
            }),
            ..Default::default()
        };
        assert!(computer.department_name().is_none());
    }

    #[test]
    fn test_filter_options_partial_payload() {
        let json = r#"{
            "departments": [{"id": 1, "name": "10-цех"}, {"id": 2, "name": "2-цех"}],
            "users": ["admin"]
        }"#;

        let options: FilterOptions = serde_json::from_str(json).unwrap();
        assert_eq!(options.departments.len(), 2);
        assert!(options.sections.is_empty());
        assert!(options.type_compyuters.is_empty());
        assert_eq!(options.department_id("2-цех"), Some(2));
        assert_eq!(options.department_id("3-цех"), None);
    }

    #[test]
    fn test_computer_page_deserialization() {
        let json = r#"{"results": [{"slug": "a"}, {"slug": "b"}], "count": 120}"#;
        let page: ComputerPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.results.len(), 2);
        assert_eq!(page.count, 120);

        let page: ComputerPage = serde_json::from_str(r#"{"results": null}"#).unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.count, 0);
    }

    #[test]
    fn test_statistic_request_serialization() {
        let request = StatisticRequest {
            key: "Интернет".to_string(),
        };
        let json = serde_json::to_string(&request).unwrap();
        assert_eq!(json, r#"{"key":"Интернет"}"#);
    }

    #[test]
    fn test_summary_defaults_missing_counts() {
        let summary: InventorySummary =
            serde_json::from_str(r#"{"all_compyuters_count": 42}"#).unwrap();
        assert_eq!(summary.all_compyuters_count, 42);
        assert_eq!(summary.all_compyuters_with_mfo, 0);
    }
}
