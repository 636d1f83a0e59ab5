// Catalogue of the dataset's columns. The CSV has shipped with two header
// generations ("Valor Mun Area" and "valor_mun_area") and the dashboard used a
// third, renamed set ("Valor_Municipal_Area"); all of them resolve here.

/// Which normalizer a column goes through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    Text,
    Population,
    /// Known Brazilian formatting, every dot is a thousands separator.
    Strict,
    /// Ratings and percentages, a lone dot is a decimal point.
    General,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Name,
    Code,
    Uf,
    Population,
    Vegetation,
    AreaRating,
    Relief,
    QuarterQuality(u8),
    Insalubrity,
    QuarterTotal(u8),
    AverageRating,
    CityArea,
    GeoreferencedArea,
    GeoreferencedPercent,
    PropertyCount,
    CarAreaTotal,
    CarAreaMean,
    CarPerimeterTotal,
    CarPerimeterMean,
    MaxPerimeterArea,
    ValuationByPerimeter,
    ValuationByArea,
    MeanValue,
    MeanCarValue,
    MeanCarPerimeterValue,
}

impl Column {
    pub const ALL: [Column; 31] = [
        Column::Name,
        Column::Code,
        Column::Uf,
        Column::Population,
        Column::Vegetation,
        Column::AreaRating,
        Column::Relief,
        Column::QuarterQuality(1),
        Column::QuarterQuality(2),
        Column::QuarterQuality(3),
        Column::QuarterQuality(4),
        Column::Insalubrity,
        Column::QuarterTotal(1),
        Column::QuarterTotal(2),
        Column::QuarterTotal(3),
        Column::QuarterTotal(4),
        Column::AverageRating,
        Column::CityArea,
        Column::GeoreferencedArea,
        Column::GeoreferencedPercent,
        Column::PropertyCount,
        Column::CarAreaTotal,
        Column::CarAreaMean,
        Column::CarPerimeterTotal,
        Column::CarPerimeterMean,
        Column::MaxPerimeterArea,
        Column::ValuationByPerimeter,
        Column::ValuationByArea,
        Column::MeanValue,
        Column::MeanCarValue,
        Column::MeanCarPerimeterValue,
    ];

    /// Header names in priority order; the first one present in a file wins.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Column::Name => &["Municipio", "mun_nome", "Nm Mun", "Municipio_Raw", "NM_MUN"],
            Column::Code => &["Codigo_Municipio", "CD_MUN", "Cd Mun"],
            Column::Uf => &["UF", "SIGLA_UF", "Sigla Uf"],
            Column::Population => &["Populacao", "populacao"],
            Column::Vegetation => &["Nota_Vegetacao", "nota_veg", "Nota Veg"],
            Column::AreaRating => &["Nota_Area", "nota_area", "Nota Area"],
            Column::Relief => &["Nota_Relevo", "nota_relevo", "Nota Relevo"],
            Column::QuarterQuality(1) => &["Nota_P_Q1", "nota_p_q1", "Nota P Q1"],
            Column::QuarterQuality(2) => &["Nota_P_Q2", "nota_p_q2", "Nota P Q2"],
            Column::QuarterQuality(3) => &["Nota_P_Q3", "nota_p_q3", "Nota P Q3"],
            Column::QuarterQuality(4) => &["Nota_P_Q4", "nota_p_q4", "Nota P Q4"],
            Column::QuarterQuality(_) => &[],
            Column::Insalubrity => &["Nota_Insalubridade", "nota_insalub", "Nota Insalub"],
            Column::QuarterTotal(1) => &["Nota_Total_Q1", "nota_total_q1", "Nota Total Q1"],
            Column::QuarterTotal(2) => &["Nota_Total_Q2", "nota_total_q2", "Nota Total Q2"],
            Column::QuarterTotal(3) => &["Nota_Total_Q3", "nota_total_q3", "Nota Total Q3"],
            Column::QuarterTotal(4) => &["Nota_Total_Q4", "nota_total_q4", "Nota Total Q4"],
            Column::QuarterTotal(_) => &[],
            Column::AverageRating => &["Nota_Media", "nota_media", "Nota Media"],
            Column::CityArea => &["Area_Cidade", "area_municip", "Area Cidade"],
            Column::GeoreferencedArea => &["Area_Georreferenciada", "area_georef", "Area Georef"],
            Column::GeoreferencedPercent => &[
                "Percentual_Area_Georref",
                "percent_area_georef",
                "Percent Area Georef",
            ],
            Column::PropertyCount => &["Num_Imoveis", "num_imoveis", "Num Imoveis"],
            Column::CarAreaTotal => &["Area_CAR_Total", "area_car_total", "Area Car Total"],
            Column::CarAreaMean => &["Area_CAR_Media", "area_car_media", "Area Car Media"],
            Column::CarPerimeterTotal => &[
                "Perimetro_Total_CAR",
                "perimetro_total_car",
                "Perimetro Total Car",
            ],
            Column::CarPerimeterMean => &[
                "Perimetro_Medio_CAR",
                "perimetro_medio_car",
                "Perimetro Medio Car",
            ],
            Column::MaxPerimeterArea => &["Area_Max_Perimetro", "area_max_perim", "Area Max Perim"],
            Column::ValuationByPerimeter => &[
                "Valor_Municipal_Perimetro",
                "valor_mun_perim",
                "Valor Mun Perim",
            ],
            Column::ValuationByArea => &["Valor_Municipal_Area", "valor_mun_area", "Valor Mun Area"],
            Column::MeanValue => &["Valor_Medio", "valor_medio", "Valor Medio"],
            Column::MeanCarValue => &["Valor_Medio_CAR", "valor_medio_car", "Valor Medio Car"],
            Column::MeanCarPerimeterValue => &[
                "Valor_Medio_CAR_Perimetro",
                "val_med_car_perim",
                "Val Med Car Perim",
            ],
        }
    }

    pub fn kind(&self) -> NumberKind {
        match self {
            Column::Name | Column::Uf => NumberKind::Text,
            Column::Population => NumberKind::Population,
            Column::Vegetation
            | Column::AreaRating
            | Column::Relief
            | Column::QuarterQuality(_)
            | Column::Insalubrity
            | Column::QuarterTotal(_)
            | Column::AverageRating
            | Column::GeoreferencedPercent => NumberKind::General,
            _ => NumberKind::Strict,
        }
    }

    /// Canonical header, as used by the dashboard after renaming.
    pub fn canonical_name(&self) -> &'static str {
        self.aliases().first().copied().unwrap_or("")
    }
}
