#[derive(Debug, Clone)]
pub enum Message {
    // === PIECE MESSAGES ===
    PieceCreated(i64, String), // id, article
    PieceUpdated(i64),
    PieceDeleted(i64),
    PieceNotFound(i64),
    PieceDetailsHeader(i64),
    NoPiecesFound,
    NoFieldsToUpdate,
    ConfirmDeletePiece(i64, String), // id, article
    OperationCancelled,
    PromptArticle,
    PromptField(String), // field label

    // === SEARCH MESSAGES ===
    SearchPage {
        page: u32,
        pages: u32,
        shown: usize,
        total: u64,
    },

    // === IMAGE MESSAGES ===
    ImageAttached(i64),
    ImageRemoved(i64),
    ImageWarning(String),
    PreviewReady(u32, u32), // width, height
    PreviewUnavailable(String),
    PreviewTimedOut,
    PieceHasNoImage(i64),

    // === EXPORT / IMPORT MESSAGES ===
    ExportCompleted(usize, String), // rows, path
    ExportEmpty,
    ImportCompleted(usize, usize), // imported, skipped
    ImportAlreadyDone,
    ImportStoreNotEmpty,

    // === HISTORY MESSAGES ===
    HistoryEmpty,
    HistoryUnavailable(String),

    // === CONFIG MESSAGES ===
    DataDirectory(String),
    ConfigSaved(String),
    ConfigRemoved(String),

    // === MIGRATION MESSAGES ===
    DatabaseVersion(u32),
    DatabaseUpToDate,
    DatabaseNeedsUpdate,
    MigrationHistory,
    MigrationHistoryEntry(u32, String, String), // version, name, applied at
}
