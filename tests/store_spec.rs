use chrono::Utc;
use contract_ledger::db::Store;
use contract_ledger::models::*;
use speculate2::speculate;

fn contract_rows(store: &Store) -> usize {
    store.contract_log().expect("Query failed").len()
}

speculate! {
    before {
        let store = Store::open_memory().expect("Failed to create in-memory database");
        store.initialize().expect("Failed to create tables");
    }

    describe "initialize" {
        it "can run again on a populated store" {
            store.insert_project("Alpha", Utc::now()).expect("Insert failed");
            store.initialize().expect("Second initialize failed");

            assert_eq!(store.project_rows().expect("Query failed").len(), 1);
        }
    }

    describe "insert_project" {
        it "returns increasing ids" {
            let first = store.insert_project("Alpha", Utc::now()).expect("Insert failed");
            let second = store.insert_project("Alpha", Utc::now()).expect("Insert failed");

            assert!(second > first);
            assert_eq!(store.project_rows().expect("Query failed").len(), 2);
        }
    }

    describe "find_project_name" {
        it "returns the saved name for the returned id" {
            let mut project = Project::new("Alpha");
            let id = project.save_to_store(&store).expect("Save failed");

            assert_eq!(project.id(), Some(id));
            assert_eq!(store.find_project_name(id).expect("Lookup failed"), Some("Alpha".to_string()));
        }

        it "returns None for an unknown id" {
            assert!(store.find_project_name(42).expect("Lookup failed").is_none());
        }
    }

    describe "insert_contract" {
        it "appends a row on every save" {
            let mut contract = Contract::new("C1");
            let first = contract.save_to_store(&store).expect("Save failed");
            let second = contract.save_to_store(&store).expect("Save failed");

            assert_ne!(first, second);
            assert_eq!(contract.id(), Some(second));
            assert_eq!(contract_rows(&store), 2);
        }

        it "stores status labels and nullable fields" {
            let project_id = store.insert_project("Alpha", Utc::now()).expect("Insert failed");
            let signed = Utc::now();
            store
                .insert_contract("C1", Utc::now(), ContractStatus::Active, Some(signed), Some(project_id))
                .expect("Insert failed");

            let rows = store.contract_log().expect("Query failed");
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].status, ContractStatus::Active);
            assert_eq!(rows[0].project_id, Some(project_id));
            assert_eq!(rows[0].project_name.as_deref(), Some("Alpha"));
            assert_eq!(
                rows[0].signing_date.map(|d| d.timestamp()),
                Some(signed.timestamp())
            );
        }
    }

    describe "latest_contracts" {
        it "keeps the newest snapshot of each contract" {
            let project = {
                let mut p = Project::new("Alpha");
                p.save_to_store(&store).expect("Save failed");
                p
            };

            let mut c1 = Contract::new("C1");
            c1.save_to_store(&store).expect("Save failed");
            let _ = c1.confirm_contract(&project);
            c1.save_to_store(&store).expect("Save failed");
            c1.finish_contract(&store).expect("Finish failed");

            let mut c2 = Contract::new("C2");
            c2.save_to_store(&store).expect("Save failed");

            assert_eq!(contract_rows(&store), 4);

            let latest = store.latest_contracts().expect("Query failed");
            assert_eq!(latest.len(), 2);
            assert_eq!(latest[0].name, "C1");
            assert_eq!(latest[0].status, ContractStatus::Finished);
            assert!(latest[0].project_id.is_none());
            assert_eq!(latest[1].name, "C2");
            assert_eq!(latest[1].status, ContractStatus::Draft);
        }
    }

    describe "file-backed store" {
        it "keeps rows across store handles" {
            let dir = tempfile::tempdir().expect("Failed to create temp dir");
            let path = dir.path().join("nested").join("ledger.db");

            let first = Store::open(&path).expect("Open failed");
            first.initialize().expect("Initialize failed");
            let id = first.insert_project("Alpha", Utc::now()).expect("Insert failed");

            let second = Store::open(&path).expect("Reopen failed");
            second.initialize().expect("Initialize failed");
            assert_eq!(second.path(), Some(path.as_path()));
            assert_eq!(second.find_project_name(id).expect("Lookup failed"), Some("Alpha".to_string()));
        }
    }
}
