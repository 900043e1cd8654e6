//! Integration tests for pattern and model generation
//!
//! Each test scaffolds into a fresh temporary project directory.

use pattern_forge::prelude::*;
use pattern_forge::scaffold::provider::MARKERS;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn project(dir: &TempDir) -> Project {
    Project::load(dir.path()).unwrap()
}

fn generate(project: &Project, name: &str, model: Option<ModelRef>) -> GenerationReport {
    let stubs = StubSet::load(project.stubs_dir().as_deref()).unwrap();
    PatternGenerator::new(project, &stubs, name, model)
        .unwrap()
        .plan()
        .unwrap()
        .apply()
        .unwrap()
}

fn read(dir: &TempDir, path: &str) -> String {
    fs::read_to_string(dir.path().join(path)).unwrap()
}

fn php_files(dir: &Path, found: &mut Vec<std::path::PathBuf>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            php_files(&path, found);
        } else if path.extension().is_some_and(|ext| ext == "php") {
            found.push(path);
        }
    }
}

/// A full pattern run creates all eight files
#[test]
fn test_generates_complete_pattern() {
    let dir = TempDir::new().unwrap();
    let project = project(&dir);

    let report = generate(&project, "User", None);
    assert_eq!(report.entries().len(), 8);
    assert_eq!(report.changed(), 8);

    for entry in report.entries() {
        assert!(
            dir.path().join(&entry.path).is_file(),
            "missing {}",
            entry.path.display()
        );
    }

    let provider = read(&dir, "app/Providers/RepositoryServiceProvider.php");
    assert!(provider.contains("namespace App\\Providers;"));
    assert!(provider.contains("use App\\Services\\Repositories\\User\\UserRepositoryInterface;"));
    assert!(provider.contains("use App\\Services\\Repositories\\User\\UserEloquentRepository;"));
    assert!(provider.contains(
        "$this->app->singleton(UserRepositoryInterface::class, UserEloquentRepository::class);"
    ));

    let internal = read(&dir, "app/Providers/InternalServiceProvider.php");
    assert!(internal.contains("$this->app->singleton(UserServiceInterface::class, UserService::class);"));
    assert!(internal.contains("UserServiceInterface::class,"));
}

/// No template placeholder survives rendering
#[test]
fn test_no_placeholders_left() {
    let dir = TempDir::new().unwrap();
    let project = project(&dir);
    generate(&project, "OrderItem", None);

    let mut files = Vec::new();
    php_files(dir.path(), &mut files);
    assert_eq!(files.len(), 8);
    for file in files {
        let content = fs::read_to_string(&file).unwrap();
        assert!(!content.contains("{{"), "{} has a placeholder", file.display());
        assert!(!content.contains("}}"), "{} has a placeholder", file.display());
    }
}

/// A second run for the same name fails and changes nothing
#[test]
fn test_rerun_never_overwrites() {
    let dir = TempDir::new().unwrap();
    let project = project(&dir);
    generate(&project, "User", None);

    let service = "app/Services/Internals/User/UserService.php";
    fs::write(dir.path().join(service), "<?php // edited by hand\n").unwrap();
    let provider_before = read(&dir, "app/Providers/RepositoryServiceProvider.php");

    let stubs = StubSet::embedded().unwrap();
    let err = PatternGenerator::new(&project, &stubs, "User", None)
        .unwrap()
        .plan()
        .unwrap_err();
    assert!(matches!(err, PatternError::TargetExists(_)));
    assert!(err.to_string().ends_with("already exists"));

    assert_eq!(read(&dir, service), "<?php // edited by hand\n");
    assert_eq!(
        read(&dir, "app/Providers/RepositoryServiceProvider.php"),
        provider_before
    );
}

/// A conflict on a late file is found before the early files are written
#[test]
fn test_conflict_leaves_project_untouched() {
    let dir = TempDir::new().unwrap();
    let project = project(&dir);

    let blocker = dir.path().join("app/Services/Internals/Invoice/InvoiceService.php");
    fs::create_dir_all(blocker.parent().unwrap()).unwrap();
    fs::write(&blocker, "<?php").unwrap();

    let stubs = StubSet::embedded().unwrap();
    assert!(PatternGenerator::new(&project, &stubs, "Invoice", None)
        .unwrap()
        .plan()
        .is_err());

    assert!(!dir.path().join("app/Services/Repositories").exists());
    assert!(!dir.path().join("app/Providers").exists());
}

/// Providers collect several patterns, each bound once
#[test]
fn test_providers_accumulate_without_duplicates() {
    let dir = TempDir::new().unwrap();
    let project = project(&dir);
    generate(&project, "User", None);
    let report = generate(&project, "Order", None);

    let actions: Vec<_> = report.entries().iter().map(|e| e.action).collect();
    assert_eq!(actions.iter().filter(|a| **a == FileAction::Updated).count(), 2);
    assert_eq!(actions.iter().filter(|a| **a == FileAction::Skipped).count(), 2);

    let provider = read(&dir, "app/Providers/RepositoryServiceProvider.php");
    for name in ["User", "Order"] {
        let binding = format!(
            "$this->app->singleton({name}RepositoryInterface::class, {name}EloquentRepository::class);"
        );
        assert_eq!(provider.matches(&binding).count(), 1);
        assert_eq!(
            provider
                .matches(&format!("{name}RepositoryInterface::class,\n"))
                .count(),
            1
        );
    }
    for marker in MARKERS {
        assert_eq!(provider.matches(marker).count(), 1);
    }
}

/// A dry run renders everything and writes nothing
#[test]
fn test_plan_without_apply_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let project = project(&dir);
    let stubs = StubSet::embedded().unwrap();

    let plan = PatternGenerator::new(&project, &stubs, "User", None)
        .unwrap()
        .plan()
        .unwrap();
    assert_eq!(plan.writes().len(), 8);
    assert!(fs::read_dir(dir.path()).unwrap().next().is_none());
}

/// Configuration and composer.json change where and how files land
#[test]
fn test_custom_layout_and_namespace() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("composer.json"),
        r#"{"autoload": {"psr-4": {"Shop\\": "src/"}}}"#,
    )
    .unwrap();
    fs::write(
        dir.path().join("pattern-forge.toml"),
        "[paths]\napp = \"src\"\ninternal = \"Domain/Services\"\n",
    )
    .unwrap();

    let project = project(&dir);
    generate(&project, "Cart", None);

    let service = read(&dir, "src/Domain/Services/Cart/CartService.php");
    assert!(service.contains("namespace Shop\\Domain\\Services\\Cart;"));
    assert!(service.contains("use Shop\\Domain\\Services\\BaseInternalService;"));
    assert!(dir
        .path()
        .join("src/Services/Repositories/Cart/CartEloquentRepository.php")
        .is_file());
}

/// Project stub overrides are used in place of the defaults
#[test]
fn test_stub_override() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("pattern-forge.toml"),
        "[stubs]\ndir = \"stubs/pattern\"\n",
    )
    .unwrap();
    let stub_dir = dir.path().join("stubs/pattern");
    pattern_forge::stubs::publish(&stub_dir, false).unwrap();
    fs::write(
        stub_dir.join("service.interface.stub"),
        "<?php\n\nnamespace {{namespace}};\n\n/** custom */\ninterface {{interface_name}}\n{\n}\n",
    )
    .unwrap();

    let project = project(&dir);
    generate(&project, "User", None);
    assert!(read(&dir, "app/Services/Internals/User/UserServiceInterface.php").contains("/** custom */"));
}

/// Model from a live SQLite table, then a pattern bound to it
#[tokio::test]
async fn test_model_from_sqlite_then_pattern() {
    let dir = TempDir::new().unwrap();
    let db = dir.path().join("shop.sqlite");
    let url = format!("sqlite://{}?mode=rwc", db.display());

    let pool = sqlx::SqlitePool::connect(&url).await.unwrap();
    sqlx::query(
        "CREATE TABLE products (
            id INTEGER PRIMARY KEY,
            sku TEXT NOT NULL,
            title TEXT NOT NULL,
            price INTEGER,
            created_at TIMESTAMP,
            updated_at TIMESTAMP
        )",
    )
    .execute(&pool)
    .await
    .unwrap();
    pool.close().await;

    fs::write(
        dir.path().join("pattern-forge.toml"),
        format!("[database]\nurl = \"{url}\"\n"),
    )
    .unwrap();
    let project = project(&dir);
    let stubs = StubSet::embedded().unwrap();

    let inspector = SqlxInspector::connect(&project.database_target().unwrap())
        .await
        .unwrap();
    let models = ModelGenerator::new(&project, &stubs, "Models/Product", "products").unwrap();
    models.plan_from(&inspector).await.unwrap().apply().unwrap();

    let model = read(&dir, "app/Models/Product.php");
    assert!(model.contains("namespace App\\Models;"));
    assert!(model.contains("protected $table = 'products';"));
    let fillable: Vec<_> = ["'sku',", "'title',", "'price'"]
        .iter()
        .map(|f| model.find(f).unwrap())
        .collect();
    assert!(fillable.windows(2).all(|w| w[0] < w[1]), "columns keep table order");
    assert!(!model.contains("'id'"));

    let report = generate(&project, "Product", Some(models.model_ref()));
    assert_eq!(report.changed(), 8);
    let repository = read(&dir, "app/Services/Repositories/Product/ProductEloquentRepository.php");
    assert!(repository.contains("use App\\Models\\Product;"));
    assert!(repository.contains("return Product::class;"));

    let err = models.plan_from(&inspector).await.unwrap_err();
    assert!(matches!(err, PatternError::TargetExists(_)));
}
