//! Built-in plotting model
//!
//! ```text
//! page
//! '- plots...      (plot)
//!    |- legend     (legend)
//!    |- series...  (series)
//!    '- text...    (text)
//! ```
//!
//! `axis` and `point` are declared but hang off no slot; extend `plot` or
//! `series` with them where needed.
//!
//! Series colours defer to each other so that setting `color` alone colours
//! lines and markers alike.

use crate::definition::Definition;
use crate::model::{Model, ModelBuilder};

/// Kind definitions of the plotting model
pub const DEFINITION: &str = r#"
[kinds.page.options]
size = {}
backgroundColor = { default = "white" }

[[kinds.page.slots]]
name = "plots"
container = "plot"

[kinds.plot.options]
size = {}
dpi = { default = 300 }
backgroundColor = { default = "white", inherit = true }
xlabel = { default = "" }
ylabel = { default = "" }
xlim = {}
ylim = {}
xlog = {}
ylog = {}
xshift = {}
yshift = {}
xticks = {}
yticks = {}
grid = { default = true }
xgrid = {}
ygrid = {}

[[kinds.plot.slots]]
name = "legend"
item = "legend"

[[kinds.plot.slots]]
name = "series"
container = "series"

[[kinds.plot.slots]]
name = "text"
container = "text"

[kinds.legend.options]
visible = { default = true }
location = { default = "right-of" }

[kinds.axis.options]
log = { default = false }
logBase = { default = 10 }
min = {}
max = {}
format = {}
majorInterval = {}
minorInterval = {}
majorTicks = { default = true }
minorTicks = { default = false }
majorGridVisible = { default = true }
minorGridVisible = { default = false }
majorGridColor = {}
minorGridColor = {}
majorGridLineStyle = { default = "solid" }
minorGridLineStyle = { default = "solid" }

[kinds.series.options]
color = { inherit = true }
lineVisible = { default = true }
lineColor = { defer = "color" }
lineStyle = { default = "solid" }
markerVisible = { default = true }
markerColor = { defer = "color" }
markerFillColor = { defer = "markerColor" }
markerLineColor = { defer = "markerColor" }
markerFilled = { default = true }
markerShape = {}
markerSize = { default = 4 }
showInLegend = { default = true }
legendKey = {}
legendNumPoints = { default = 1 }

[kinds.point.options]
color = { inherit = true }
lineVisible = { default = true }
lineColor = {}
lineStyle = { default = "solid" }
markerVisible = { default = true }
markerColor = {}
markerFillColor = {}
markerLineColor = {}
markerFilled = { default = true }
markerShape = {}
markerSize = { default = 4 }

[kinds.text.options]
color = { inherit = true }
anchor = { default = "center" }
"#;

/// The plotting kinds, ready to be extended with further kinds
pub fn definition() -> Definition {
    Definition::from_str(DEFINITION).expect("Built-in plotting definition must parse")
}

/// A builder holding the plotting kinds
pub fn builder() -> ModelBuilder {
    definition().into_builder()
}

/// The plotting model
pub fn model() -> Model {
    builder()
        .build()
        .expect("Built-in plotting definition must be valid")
}
