use std::{collections::BTreeSet, path::Path};

use serde::{Deserialize, Serialize};

use crate::{catalog::LocationLookup, error::LoadError, planner::LocationMap};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineRecord {
    pub eid: u32,
    pub name: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseRecord {
    pub dbid: u32,
    pub engine_id: u32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IslandRecord {
    pub iid: u32,
    pub scope_name: String,
}

/// An island reaching an engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShimRecord {
    pub shim_id: u32,
    pub island_id: u32,
    pub engine_id: u32,
    pub access_method: String,
}

/// Data movement from one engine to another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CastRecord {
    pub src_eid: u32,
    pub dst_eid: u32,
    pub access_method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub oid: u32,
    pub name: String,
    /// Comma separated field names.
    #[serde(default)]
    pub fields: String,
    pub logical_db: u32,
    pub physical_db: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DbOfEngine {
    pub db: String,
    pub engine: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DbOfIsland {
    pub db: String,
    pub engine: String,
    pub island: String,
    pub access_method: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DbOfObject {
    pub object: String,
    pub db: String,
    pub engine: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ObjectCast {
    pub object: String,
    pub src: String,
    pub dst: String,
    pub access_method: String,
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Catalog snapshot held in memory, loadable from JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryCatalog {
    pub engines: Vec<EngineRecord>,
    pub databases: Vec<DatabaseRecord>,
    pub islands: Vec<IslandRecord>,
    pub shims: Vec<ShimRecord>,
    pub casts: Vec<CastRecord>,
    pub objects: Vec<ObjectRecord>,
}

impl MemoryCatalog {
    pub fn from_json_str(text: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| LoadError::Io { path: path.display().to_string(), source })?;
        Self::from_json_str(&text)
    }

    fn engine(&self, eid: u32) -> Option<&EngineRecord> {
        self.engines.iter().find(|e| e.eid == eid)
    }

    fn database(&self, dbid: u32) -> Option<&DatabaseRecord> {
        self.databases.iter().find(|d| d.dbid == dbid)
    }

    fn island(&self, iid: u32) -> Option<&IslandRecord> {
        self.islands.iter().find(|i| i.iid == iid)
    }

    /// Object names from a CSV list that exist in the catalog, matched case-insensitively.
    pub fn objects_from_list(&self, csv: &str) -> Vec<String> {
        let terms: Vec<String> = csv
            .split(',')
            .map(|term| term.trim().to_lowercase())
            .filter(|term| !term.is_empty())
            .collect();

        self.objects
            .iter()
            .filter(|o| terms.contains(&o.name.to_lowercase()))
            .map(|o| o.name.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Objects whose name contains `name`, ignoring case.
    pub fn objects_by_name(&self, name: &str) -> Vec<&ObjectRecord> {
        self.objects.iter().filter(|o| contains_ignore_case(&o.name, name)).collect()
    }

    pub fn dbs_of_engine(&self, engine_name: &str) -> Vec<DbOfEngine> {
        let mut rows: Vec<DbOfEngine> = self
            .databases
            .iter()
            .filter_map(|d| {
                let engine = self.engine(d.engine_id)?;
                contains_ignore_case(&engine.name, engine_name)
                    .then(|| DbOfEngine { db: d.name.clone(), engine: engine.name.clone() })
            })
            .collect();
        rows.sort();
        rows
    }

    /// Databases whose engine is reachable from a matching island through a shim.
    pub fn dbs_of_island(&self, island_name: &str) -> Vec<DbOfIsland> {
        let mut rows = vec![];
        for shim in &self.shims {
            let Some(island) = self.island(shim.island_id) else { continue };
            if !contains_ignore_case(&island.scope_name, island_name) {
                continue;
            }
            let Some(engine) = self.engine(shim.engine_id) else { continue };
            for db in self.databases.iter().filter(|d| d.engine_id == shim.engine_id) {
                rows.push(DbOfIsland {
                    db: db.name.clone(),
                    engine: engine.name.clone(),
                    island: island.scope_name.clone(),
                    access_method: shim.access_method.clone(),
                });
            }
        }
        rows.sort();
        rows
    }

    pub fn dbs_of_object(&self, object_name: &str) -> Vec<DbOfObject> {
        let mut rows: Vec<DbOfObject> = self
            .objects_by_name(object_name)
            .into_iter()
            .filter_map(|o| {
                let db = self.database(o.physical_db)?;
                let engine = self.engine(db.engine_id)?;
                Some(DbOfObject { object: o.name.clone(), db: db.name.clone(), engine: engine.name.clone() })
            })
            .collect();
        rows.sort();
        rows
    }

    /// Casts that move any matching object off its engine in one step.
    pub fn one_step_casts_for_objects(&self, object_names: &[&str]) -> Vec<ObjectCast> {
        let mut rows = BTreeSet::new();

        for object in self.objects.iter().filter(|o| object_names.iter().any(|n| contains_ignore_case(&o.name, n))) {
            let Some(db) = self.database(object.physical_db) else { continue };
            for cast in self.casts.iter().filter(|c| c.src_eid == db.engine_id && c.src_eid != c.dst_eid) {
                let (Some(src), Some(dst)) = (self.engine(cast.src_eid), self.engine(cast.dst_eid)) else { continue };
                rows.insert(ObjectCast {
                    object: object.name.clone(),
                    src: src.name.clone(),
                    dst: dst.name.clone(),
                    access_method: cast.access_method.clone(),
                });
            }
        }

        rows.into_iter().collect()
    }
}

impl LocationLookup for MemoryCatalog {
    fn object_locations(&self, names: &[String]) -> LocationMap {
        let mut locations = LocationMap::new();

        for name in names {
            let dbs: BTreeSet<String> = self
                .objects
                .iter()
                .filter(|o| o.name.eq_ignore_ascii_case(name))
                .filter_map(|o| self.database(o.physical_db))
                .map(|db| db.name.clone())
                .collect();

            if dbs.is_empty() {
                tracing::debug!(object = %name, "object not in catalog");
                continue;
            }
            locations.insert(name.clone(), dbs.into_iter().collect());
        }

        locations
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use serde_json::json;

    use crate::catalog::{DbOfEngine, LocationLookup, MemoryCatalog, ObjectCast};

    fn catalog() -> MemoryCatalog {
        let document = json!({
            "engines": [
                {"eid": 0, "name": "postgres0", "host": "localhost", "port": 5431},
                {"eid": 1, "name": "postgres1", "host": "localhost", "port": 5430},
                {"eid": 2, "name": "scidb", "host": "localhost", "port": 1239}
            ],
            "databases": [
                {"dbid": 0, "engine_id": 0, "name": "bigdawg_catalog"},
                {"dbid": 1, "engine_id": 0, "name": "mimic2"},
                {"dbid": 2, "engine_id": 1, "name": "mimic2_copy"},
                {"dbid": 3, "engine_id": 2, "name": "scidb_local"}
            ],
            "islands": [
                {"iid": 0, "scope_name": "RELATIONAL"},
                {"iid": 1, "scope_name": "ARRAY"}
            ],
            "shims": [
                {"shim_id": 0, "island_id": 0, "engine_id": 0, "access_method": "N/A"},
                {"shim_id": 1, "island_id": 0, "engine_id": 1, "access_method": "N/A"},
                {"shim_id": 2, "island_id": 1, "engine_id": 2, "access_method": "N/A"}
            ],
            "casts": [
                {"src_eid": 0, "dst_eid": 2, "access_method": "FILE"},
                {"src_eid": 0, "dst_eid": 0, "access_method": "NOOP"}
            ],
            "objects": [
                {"oid": 0, "name": "mimic2v26.d_patients", "fields": "subject_id,sex,dob", "logical_db": 1, "physical_db": 1},
                {"oid": 1, "name": "mimic2v26.d_patients", "fields": "subject_id,sex,dob", "logical_db": 1, "physical_db": 2},
                {"oid": 2, "name": "waveform", "fields": "i,v", "logical_db": 3, "physical_db": 3}
            ]
        });
        serde_json::from_value(document).unwrap()
    }

    #[test]
    pub fn test_catalog_objects_from_list() {
        let catalog = catalog();
        assert_eq!(catalog.objects_from_list("WAVEFORM, missing, mimic2v26.D_PATIENTS"), vec!["mimic2v26.d_patients", "waveform"]);
        assert!(catalog.objects_from_list("").is_empty());
    }

    #[test]
    pub fn test_catalog_objects_by_name() {
        assert_eq!(catalog().objects_by_name("PATIENTS").len(), 2);
    }

    #[test]
    pub fn test_catalog_dbs_of_engine() {
        assert_eq!(
            catalog().dbs_of_engine("postgres0"),
            vec![
                DbOfEngine { db: "bigdawg_catalog".to_string(), engine: "postgres0".to_string() },
                DbOfEngine { db: "mimic2".to_string(), engine: "postgres0".to_string() },
            ]
        );
    }

    #[test]
    pub fn test_catalog_dbs_of_island() {
        let rows = catalog().dbs_of_island("relational");
        let dbs: Vec<&str> = rows.iter().map(|r| r.db.as_str()).collect();
        assert_eq!(dbs, vec!["bigdawg_catalog", "mimic2", "mimic2_copy"]);
        assert_eq!(catalog().dbs_of_island("array")[0].engine, "scidb");
    }

    #[test]
    pub fn test_catalog_dbs_of_object() {
        let rows = catalog().dbs_of_object("d_patients");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].db, "mimic2");
        assert_eq!(rows[1].engine, "postgres1");
    }

    #[test]
    pub fn test_catalog_one_step_casts_skip_same_engine() {
        assert_eq!(
            catalog().one_step_casts_for_objects(&["patients"]),
            vec![ObjectCast {
                object: "mimic2v26.d_patients".to_string(),
                src: "postgres0".to_string(),
                dst: "scidb".to_string(),
                access_method: "FILE".to_string(),
            }]
        );
    }

    #[test]
    pub fn test_catalog_object_locations() {
        let names = vec!["mimic2v26.d_patients".to_string(), "unknown".to_string()];
        let locations = catalog().object_locations(&names);
        assert_eq!(locations.len(), 1);
        assert_eq!(locations["mimic2v26.d_patients"], vec!["mimic2", "mimic2_copy"]);
    }

    #[test]
    pub fn test_catalog_from_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{}", r#"{"islands": [{"iid": 4, "scope_name": "TEXT"}]}"#).unwrap();

        let catalog = MemoryCatalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.islands[0].scope_name, "TEXT");
        assert!(catalog.engines.is_empty());

        assert!(MemoryCatalog::from_json_str("{\"engines\": 3}").is_err());
    }
}
