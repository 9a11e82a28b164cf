// ==========================================
// 技能矩阵管理系统 - 导入层
// ==========================================
// 职责: 外部技能矩阵文件导入
// 支持: Excel (.xlsx), CSV
// ==========================================

pub mod error;
pub mod file_parser;
pub mod matrix_importer;

pub use error::{ImportError, ImportResult};
pub use file_parser::{CsvParser, ExcelParser, FileParser, ImportFormat, RawRow};
pub use matrix_importer::{ImportRowError, MatrixImportReport, MatrixImporter};
