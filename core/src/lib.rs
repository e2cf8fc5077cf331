pub mod aggregate;
pub mod charts;
pub mod compare;
pub mod error;
pub mod filter;
pub mod grid;
pub mod model_name;
pub mod record;
pub mod session;
pub mod sort;
pub mod source;
pub mod stats;


pub use aggregate::{
    cohort_indices, recompute_improvements, tally, tally_by_kind, WinLossTally,
    ACCURACY_EPSILON_PP,
};
pub use charts::{GroupDimension, MeanAccuracyCell, SizeImprovementView, TrendSeries};
pub use compare::{compare_view, CompareSelection, CompareView};
pub use error::{Error, Result};
pub use filter::{FilterConfig, Selection};
pub use grid::{build_grid, GridSelection, GridSort, GridView};
pub use model_name::{
    ClassifiedModel, CutSpec, Discretizer, DiscretizerKind, ModelBase, ModelNameResolver,
    NamingConvention, PkiVariant,
};
pub use record::{CohortKey, Iterations, Metadata, ResultRecord, ResultSet};
pub use session::{DataState, Explorer, OverviewStats, ViewSnapshot};
pub use sort::{page_count, paginate, sort_records, SortColumn, SortDirection};
pub use source::{load_results, load_results_with, parse_results};
pub use stats::{
    fit_linear, fit_log_linear, mean, mean_std, percentile, summarize, Summary, TrendFit,
};
