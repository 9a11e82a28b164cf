// ==========================================
// 技能矩阵管理系统 - 文件解析器
// ==========================================
// 支持: CSV / Excel (.xlsx)
// 输出: 行记录 HashMap<列名(小写), 值(去空白)>
// 约束: 完全空白的行直接跳过,不计入行号以外的任何统计
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use calamine::{Reader, Xlsx};
use csv::ReaderBuilder;
use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

/// 原始行: (源文件行号, 列名 → 值)
///
/// 行号从 1 开始,表头为第 1 行
pub type RawRow = (usize, HashMap<String, String>);

/// 导入文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportFormat {
    Csv,
    Xlsx,
}

impl ImportFormat {
    /// 解析格式名（大小写不敏感）
    pub fn parse(raw: &str) -> ImportResult<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ImportFormat::Csv),
            "xlsx" => Ok(ImportFormat::Xlsx),
            other => Err(ImportError::UnsupportedFormat(other.to_string())),
        }
    }

    /// 按扩展名推断
    pub fn from_path(path: &Path) -> ImportResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        Self::parse(ext)
    }

    pub fn parser(&self) -> Box<dyn FileParser> {
        match self {
            ImportFormat::Csv => Box::new(CsvParser),
            ImportFormat::Xlsx => Box::new(ExcelParser),
        }
    }
}

// ==========================================
// FileParser Trait
// ==========================================
pub trait FileParser: Send + Sync {
    /// 解析文件内容为原始行记录
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>>;

    /// 解析磁盘文件
    fn parse_file(&self, path: &Path) -> ImportResult<Vec<RawRow>> {
        let bytes = std::fs::read(path)?;
        self.parse_bytes(&bytes)
    }
}

fn normalize_header(h: &str) -> String {
    h.trim().trim_start_matches('\u{feff}').to_ascii_lowercase()
}

fn collect_row<I>(headers: &[String], cells: I) -> HashMap<String, String>
where
    I: Iterator<Item = String>,
{
    let mut row_map = HashMap::new();
    for (col_idx, value) in cells.enumerate() {
        if let Some(header) = headers.get(col_idx) {
            if !header.is_empty() {
                row_map.insert(header.clone(), value.trim().to_string());
            }
        }
    }
    row_map
}

// ==========================================
// CSV Parser 实现
// ==========================================
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true) // 允许行长度不一致
            .from_reader(bytes);

        let headers: Vec<String> = reader.headers()?.iter().map(normalize_header).collect();

        let mut records = Vec::new();
        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let row_map = collect_row(&headers, record.iter().map(str::to_string));

            // 跳过完全空白的行
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push((idx + 2, row_map));
        }

        Ok(records)
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_bytes(&self, bytes: &[u8]) -> ImportResult<Vec<RawRow>> {
        let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;

        // 读取第一个 sheet
        let sheet_name = workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无工作表".to_string()))?;
        let range = workbook.worksheet_range(&sheet_name)?;

        let mut rows = range.rows();
        let header_row = rows
            .next()
            .ok_or_else(|| ImportError::ExcelParseError("Excel 文件无数据行".to_string()))?;
        let headers: Vec<String> = header_row
            .iter()
            .map(|cell| normalize_header(&cell.to_string()))
            .collect();

        let mut records = Vec::new();
        for (idx, data_row) in rows.enumerate() {
            let row_map = collect_row(&headers, data_row.iter().map(|c| c.to_string()));
            if row_map.values().all(|v| v.is_empty()) {
                continue;
            }
            records.push((idx + 2, row_map));
        }

        Ok(records)
    }
}
