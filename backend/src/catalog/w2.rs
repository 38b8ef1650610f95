//! The CE-QUAL-W2 control-file catalog.

use crate::models::{FieldSchema, RowSchema};
use crate::section::{ColumnRule, HeaderRule, RowGroupRule};

use super::{MatrixDef, ScalarDef, SectionDef};

pub const GRID: &str = "Grid Dimensions and General Settings";
pub const INFLOW_OUTFLOW: &str = "Inflow/Outflow Dimensions";
pub const CONSTITUENTS: &str = "Constituent Dimensions";
pub const MISCELLANEOUS: &str = "Miscellaneous Dimensions";
pub const TIME_CONTROL: &str = "Time Control";
pub const TIMESTEP_CONTROL: &str = "Timestep Control";
pub const TIMESTEP_INTERVALS: &str = "Timestep Intervals";
pub const TIMESTEP_LIMITATIONS: &str = "Timestep Limitations";
pub const BRANCH_GEOMETRY: &str = "Branch Geometry";
pub const WATERBODY_DEFINITION: &str = "Waterbody Definition";
pub const INITIAL_CONDITIONS: &str = "Initial Conditions";
pub const CALCULATIONS: &str = "Calculations";
pub const DEAD_SEA: &str = "Dead Sea";
pub const INTERPOLATION: &str = "Interpolation";
pub const HEAT_EXCHANGE: &str = "Heat Exchange";
pub const ICE_COVER: &str = "Ice Cover";
pub const TRANSPORT_SCHEME: &str = "Transport Scheme";
pub const HYDRAULIC_COEFFICIENTS: &str = "Hydraulic Coefficients";
pub const VERTICAL_EDDY_VISCOSITY: &str = "Vertical Eddy Viscosity";
pub const TRIBUTARIES: &str = "Tributaries";
pub const WITHDRAWALS: &str = "Withdrawals";
pub const SNAPSHOT_PRINT: &str = "Snapshot Print";
pub const PROFILE_PRINT: &str = "Profile Print";
pub const INPUT_FILES: &str = "Input Files";
pub const STRUCTURES: &str = "Structures";

/// Per-waterbody tables, `WB1, WB2, …`
fn per_waterbody(name: &str, rows: Vec<RowSchema>) -> SectionDef {
    MatrixDef::new(name, rows)
        .headers(HeaderRule::prefixed("WB"))
        .columns(ColumnRule::scalar(GRID, "NWB"))
        .into()
}

/// Per-branch tables, `BR1, BR2, …`
fn per_branch(name: &str, rows: Vec<RowSchema>) -> SectionDef {
    MatrixDef::new(name, rows)
        .headers(HeaderRule::prefixed("BR"))
        .columns(ColumnRule::scalar(GRID, "NBR"))
        .into()
}

fn count(label: &str, description: &str) -> FieldSchema {
    FieldSchema::integer(label).describe(description)
}

fn switch(label: &str, description: &str) -> FieldSchema {
    FieldSchema::boolean(label).describe(description)
}

fn real(label: &str, precision: u32, description: &str) -> FieldSchema {
    FieldSchema::decimal(label, precision).describe(description)
}

fn choice(label: &str, options: &[&str], description: &str) -> FieldSchema {
    FieldSchema::enumerated(label, options).describe(description)
}

/// Section definitions in display order.
pub fn sections() -> Vec<SectionDef> {
    vec![
        ScalarDef::new(
            GRID,
            vec![
                count("NWB", "Number of waterbodies in the computational grid"),
                count("NBR", "Number of branches in the computational grid"),
                count("IMX", "Number of segments in the computational grid"),
                count("KMX", "Number of layers in the computational grid"),
                count("NPROC", "Number of processors (inactive)"),
                switch("CLOSEC", "Close dialog box after executing"),
            ],
        )
        .into(),
        ScalarDef::new(
            INFLOW_OUTFLOW,
            vec![
                count("NTR", "Number of tributaries"),
                count("NST", "Number of structures"),
                count("NIW", "Number of internal weirs"),
                count("NWD", "Number of withdrawals"),
                count("NGT", "Number of gates"),
                count("NSP", "Number of spillways"),
                count("NPI", "Number of pipes"),
                count("NPU", "Number of pumps"),
            ],
        )
        .into(),
        ScalarDef::new(
            CONSTITUENTS,
            vec![
                count("NGC", "Number of generic constituents"),
                count("NSS", "Number of inorganic suspended solids"),
                count("NAL", "Number of algal groups"),
                count("NEP", "Number of epiphyton groups"),
                count("NBOD", "Number of CBOD groups"),
                count("NMC", "Number of macrophyte groups"),
                count("NZP", "Number of zooplankton groups"),
            ],
        )
        .into(),
        ScalarDef::new(
            MISCELLANEOUS,
            vec![
                count("NDAY", "Maximum number of output dates or timestep related changes"),
                switch("SELECTC", "Automatic port selection from a multiple outlet structure"),
                switch("HABTATC", "Habitat analyses for fish and eutrophication variables"),
                switch("ENVIRPC", "Environmental performance criteria"),
                switch("AERATEC", "Aeration with dissolved oxygen probe control"),
                switch("INITUWL", "Initial water surface slope and velocity for a river system"),
                switch("ORGCC", "Simulate organic matter as carbon"),
                switch("SED_DIAG", "Sediment diagenesis"),
            ],
        )
        .into(),
        ScalarDef::new(
            TIME_CONTROL,
            vec![
                real("TMSTRT", 3, "Starting time, Julian day"),
                real("TMEND", 3, "Ending time, Julian day"),
                count("YEAR", "Starting year").max(9999.0),
            ],
        )
        .into(),
        ScalarDef::new(
            TIMESTEP_CONTROL,
            vec![
                count("NDLT", "Number of timestep intervals"),
                real("DLTMIN", 5, "Minimum timestep, sec"),
            ],
        )
        .into(),
        MatrixDef::new(
            TIMESTEP_INTERVALS,
            vec![
                real("DLTD", 2, "Beginning of timestep interval, Julian day"),
                real("DLTMAX", 2, "Maximum timestep, sec"),
                real("DLTF", 2, "Fraction of calculated maximum timestep for numerical stability"),
            ],
        )
        .columns(ColumnRule::scalar(TIMESTEP_CONTROL, "NDLT"))
        .into(),
        per_waterbody(
            TIMESTEP_LIMITATIONS,
            vec![
                switch("VISC", "Waterbody viscosity and density calculations"),
                switch("CELC", "Cell by cell heat exchange computations"),
                switch("DLTADD", "Add the waterbody timestep to the minimum channel timestep"),
            ],
        ),
        per_branch(
            BRANCH_GEOMETRY,
            vec![
                count("US", "Branch upstream segment"),
                count("DS", "Branch downstream segment"),
                count("UHS", "Upstream boundary condition"),
                count("DHS", "Downstream boundary condition"),
                count("NLMIN", "Number of layers"),
                real("SLOPE", 4, "Actual slope").min(-1.0).max(1.0),
                real("SLOPEC", 4, "Hydraulic equivalent slope").min(-1.0).max(1.0),
            ],
        ),
        per_waterbody(
            WATERBODY_DEFINITION,
            vec![
                real("LAT", 4, "Latitude").min(-90.0).max(90.0),
                real("LONG", 4, "Longitude").min(-180.0).max(180.0),
                real("EBOT", 4, "Bottom elevation, m").min(-999_999.0),
                count("BS", "Starting branch of waterbody"),
                count("BE", "Ending branch of waterbody"),
                count("JBDN", "Downstream branch number"),
            ],
        ),
        per_branch(
            INITIAL_CONDITIONS,
            vec![
                real("T2I", 2, "Initial temperature, °C").min(-999.0),
                real("ICEI", 2, "Initial ice thickness, m"),
                choice("WTYPEC", &["FRESH", "SALT"], "Water type"),
                choice("GRIDC", &["RECT", "TRAP"], "Grid cell shape"),
            ],
        ),
        per_waterbody(
            CALCULATIONS,
            vec![
                switch("VBC", "Volume balance calculation"),
                switch("EBC", "Thermal energy balance calculation"),
                switch("MBC", "Mass balance calculation"),
                switch("PQC", "Density placed inflows"),
                switch("EVC", "Evaporation included in water budget"),
                switch("PRC", "Precipitation included"),
            ],
        ),
        per_waterbody(
            DEAD_SEA,
            vec![
                switch("WINDC", "Wind"),
                switch("QINC", "All sources of water"),
                switch("QOUTC", "All sinks of water"),
                switch("HEATC", "Heat exchange"),
            ],
        ),
        per_branch(
            INTERPOLATION,
            vec![
                switch("QINIC", "Interpolate inflows"),
                switch("DTRIC", "Interpolate distributed tributaries"),
                switch("HDIC", "Interpolate head boundaries"),
            ],
        ),
        per_waterbody(
            HEAT_EXCHANGE,
            vec![
                choice("SLHTC", &["TERM", "ET"], "Term-by-term or equilibrium temperature surface heat exchange"),
                switch("SROC", "Read observed short wave solar radiation"),
                switch("RHEVC", "Ryan-Harleman evaporation formula"),
                switch("METIC", "Meteorological data interpolation"),
                switch("FETCHC", "Fetch calculation"),
                real("AFW", 2, "a coefficient in the wind speed formulation"),
                real("BFW", 2, "b coefficient in the wind speed formulation"),
                real("CFW", 2, "c coefficient in the wind speed formulation"),
                real("WINDH", 2, "Wind speed measurement height, m"),
            ],
        ),
        per_waterbody(
            ICE_COVER,
            vec![
                switch("ICEC", "Allow ice calculations"),
                choice("SLICEC", &["SIMPLE", "DETAIL"], "Ice cover calculation method"),
                real("ALBEDO", 2, "Albedo of ice").max(1.0),
                real("HWI", 2, "Coefficient of water-ice heat exchange"),
                real("BETAI", 2, "Fraction of solar radiation absorbed in the ice surface").max(1.0),
                real("GAMMAI", 2, "Solar radiation extinction coefficient, m-1"),
                real("ICEMIN", 2, "Minimum ice thickness before ice formation, m"),
                real("ICET2", 2, "Temperature above which ice formation is not allowed, °C"),
            ],
        ),
        per_waterbody(
            TRANSPORT_SCHEME,
            vec![
                choice("SLTRC", &["ULTIMATE", "QUICKEST", "UPWIND"], "Transport solution scheme"),
                real("THETA", 2, "Time-weighting for vertical advection scheme").max(1.0),
            ],
        ),
        per_waterbody(
            HYDRAULIC_COEFFICIENTS,
            vec![
                real("AX", 2, "Longitudinal eddy viscosity, m2 sec-1"),
                real("DX", 2, "Longitudinal eddy diffusivity, m2 sec-1"),
                real("CBHE", 2, "Coefficient of bottom heat exchange, W m-2 sec-1"),
                real("TSED", 2, "Sediment temperature, °C"),
                real("FI", 2, "Interfacial friction factor"),
                real("TSEDF", 2, "Heat lost to sediments that is added back to water column"),
                choice("FRICC", &["MANN", "CHEZY"], "Bottom friction solution"),
            ],
        ),
        per_waterbody(
            VERTICAL_EDDY_VISCOSITY,
            vec![
                choice(
                    "AZC",
                    &["NICK", "PARAB", "RNG", "W2", "W2N", "TKE"],
                    "Vertical turbulence closure algorithm",
                ),
                choice("AZSLC", &["IMP", "EXP"], "Implicit or explicit vertical eddy viscosity"),
                real("AZMAX", 5, "Maximum vertical eddy viscosity, m2 s-1"),
            ],
        ),
        MatrixDef::new(
            TRIBUTARIES,
            vec![
                FieldSchema::text("TRNAME").describe("Tributary name"),
                choice("PTRC", &["DISTR", "DENSITY", "SPECIFY"], "Inflow placement"),
                count("ITR", "Tributary segment"),
                real("ELTRT", 2, "Top elevation for specified placement, m").min(-999_999.0),
                real("ELTRB", 2, "Bottom elevation for specified placement, m").min(-999_999.0),
                switch("TRIC", "Interpolate tributary inflows"),
            ],
        )
        .headers(HeaderRule::named("TR", "TRNAME"))
        .columns(ColumnRule::scalar(INFLOW_OUTFLOW, "NTR"))
        .into(),
        MatrixDef::new(
            WITHDRAWALS,
            vec![
                FieldSchema::text("WDNAME").describe("Withdrawal name"),
                count("IWD", "Withdrawal segment"),
                real("EWD", 2, "Withdrawal centerline elevation, m").min(-999_999.0),
                count("KTWD", "Top layer above which selective withdrawal does not occur"),
                count("KBWD", "Bottom layer below which selective withdrawal does not occur"),
                switch("WDIC", "Interpolate withdrawal outflows"),
            ],
        )
        .headers(HeaderRule::named("WD", "WDNAME"))
        .columns(ColumnRule::scalar(INFLOW_OUTFLOW, "NWD"))
        .into(),
        MatrixDef::new(
            SNAPSHOT_PRINT,
            vec![
                switch("SNPC", "Snapshot output"),
                count("NSNP", "Number of snapshot dates"),
                count("NISNP", "Number of segments printed"),
                real("SNPD", 2, "Snapshot date, Julian day"),
                real("SNPF", 2, "Snapshot frequency, days"),
            ],
        )
        .headers(HeaderRule::auxiliary("SNP"))
        .columns(ColumnRule::row_max("NSNP"))
        .into(),
        MatrixDef::new(
            PROFILE_PRINT,
            vec![
                switch("PRFC", "Profile output"),
                count("NPRF", "Number of profile dates"),
                count("NIPRF", "Number of profile segments"),
                real("PRFD", 2, "Profile date, Julian day"),
                real("PRFF", 2, "Profile frequency, days"),
                count("IPRF", "Profile segment"),
            ],
        )
        .headers(HeaderRule::auxiliary("PRF"))
        .columns(ColumnRule::row_product("NPRF", "NIPRF"))
        .into(),
        ScalarDef::new(
            INPUT_FILES,
            vec![
                FieldSchema::file_ref("BTHFN").describe("Bathymetry file"),
                FieldSchema::file_ref("RSIFN").describe("Restart input file"),
                FieldSchema::file_ref("METFN").describe("Meteorology file"),
                FieldSchema::file_ref("QWDFN").describe("Withdrawal flow file"),
                FieldSchema::file_ref("QGTFN").describe("Gate flow file"),
                FieldSchema::file_ref("WSCFN").describe("Wind sheltering file"),
                FieldSchema::file_ref("SHDFN").describe("Shade file"),
                FieldSchema::file_ref("VPRFN").describe("Vertical profile file"),
                FieldSchema::file_ref("LPRFN").describe("Longitudinal profile file"),
            ],
        )
        .into(),
        MatrixDef::new(
            STRUCTURES,
            vec![
                count("NSTR", "Number of branch outlet structures"),
                switch("DYNSTRUC", "Dynamic centerline elevation read from dynselevX.npt"),
            ],
        )
        .headers(HeaderRule::prefixed("BR"))
        .columns(ColumnRule::scalar(GRID, "NBR"))
        .row_groups(RowGroupRule::new("NSTR", structure_kinds()))
        .into(),
    ]
}

/// Row kinds repeated once per outlet structure.
fn structure_kinds() -> Vec<RowSchema> {
    vec![
        FieldSchema::text("STRUCT").describe("Structure name"),
        count("KTSTR", "Top layer above which selective withdrawal does not occur"),
        count("KBSTR", "Bottom layer below which selective withdrawal does not occur"),
        choice("SINKC", &["LINE", "POINT"], "Sink type used in selective withdrawal"),
        real("ESTR", 2, "Centerline elevation, m").min(-999_999.0),
        real("WSTR", 2, "Width of line sink, m"),
    ]
}
