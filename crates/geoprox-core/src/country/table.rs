// crates/geoprox-core/src/country/table.rs

/// Long-form country names (and common alternates) to ISO 3166-1 alpha-3.
///
/// Keys are matched after [`fold_key`](crate::text::fold_key), so casing,
/// accents and extra whitespace don't matter here.
pub(super) static COUNTRY_ISO3: &[(&str, &str)] = &[
    ("Afghanistan", "AFG"),
    ("Åland Islands", "ALA"),
    ("Albania", "ALB"),
    ("Algeria", "DZA"),
    ("American Samoa", "ASM"),
    ("Andorra", "AND"),
    ("Angola", "AGO"),
    ("Anguilla", "AIA"),
    ("Antarctica", "ATA"),
    ("Antigua and Barbuda", "ATG"),
    ("Argentina", "ARG"),
    ("Armenia", "ARM"),
    ("Aruba", "ABW"),
    ("Australia", "AUS"),
    ("Austria", "AUT"),
    ("Azerbaijan", "AZE"),
    ("Bahamas", "BHS"),
    ("The Bahamas", "BHS"),
    ("Bahrain", "BHR"),
    ("Bangladesh", "BGD"),
    ("Barbados", "BRB"),
    ("Belarus", "BLR"),
    ("Belgium", "BEL"),
    ("Belize", "BLZ"),
    ("Benin", "BEN"),
    ("Bermuda", "BMU"),
    ("Bhutan", "BTN"),
    ("Bolivia", "BOL"),
    ("Bolivia (Plurinational State of)", "BOL"),
    ("Bonaire, Sint Eustatius and Saba", "BES"),
    ("Bosnia and Herzegovina", "BIH"),
    ("Botswana", "BWA"),
    ("Bouvet Island", "BVT"),
    ("Brazil", "BRA"),
    ("British Indian Ocean Territory", "IOT"),
    ("British Virgin Islands", "VGB"),
    ("Virgin Islands (British)", "VGB"),
    ("Brunei", "BRN"),
    ("Brunei Darussalam", "BRN"),
    ("Bulgaria", "BGR"),
    ("Burkina Faso", "BFA"),
    ("Burundi", "BDI"),
    ("Cabo Verde", "CPV"),
    ("Cape Verde", "CPV"),
    ("Cambodia", "KHM"),
    ("Cameroon", "CMR"),
    ("Canada", "CAN"),
    ("Cayman Islands", "CYM"),
    ("Central African Republic", "CAF"),
    ("Chad", "TCD"),
    ("Chile", "CHL"),
    ("China", "CHN"),
    ("Christmas Island", "CXR"),
    ("Cocos (Keeling) Islands", "CCK"),
    ("Colombia", "COL"),
    ("Comoros", "COM"),
    ("Congo", "COG"),
    ("Republic of the Congo", "COG"),
    ("Congo-Brazzaville", "COG"),
    ("Democratic Republic of the Congo", "COD"),
    ("Congo, Democratic Republic of the", "COD"),
    ("DR Congo", "COD"),
    ("DRC", "COD"),
    ("Cook Islands", "COK"),
    ("Costa Rica", "CRI"),
    ("Côte d'Ivoire", "CIV"),
    ("Cote d'Ivoire", "CIV"),
    ("Ivory Coast", "CIV"),
    ("Croatia", "HRV"),
    ("Cuba", "CUB"),
    ("Curaçao", "CUW"),
    ("Cyprus", "CYP"),
    ("Czechia", "CZE"),
    ("Czech Republic", "CZE"),
    ("Denmark", "DNK"),
    ("Djibouti", "DJI"),
    ("Dominica", "DMA"),
    ("Dominican Republic", "DOM"),
    ("Ecuador", "ECU"),
    ("Egypt", "EGY"),
    ("El Salvador", "SLV"),
    ("Equatorial Guinea", "GNQ"),
    ("Eritrea", "ERI"),
    ("Estonia", "EST"),
    ("Eswatini", "SWZ"),
    ("Swaziland", "SWZ"),
    ("Ethiopia", "ETH"),
    ("Falkland Islands", "FLK"),
    ("Falkland Islands (Malvinas)", "FLK"),
    ("Faroe Islands", "FRO"),
    ("Fiji", "FJI"),
    ("Finland", "FIN"),
    ("France", "FRA"),
    ("French Guiana", "GUF"),
    ("French Polynesia", "PYF"),
    ("French Southern Territories", "ATF"),
    ("Gabon", "GAB"),
    ("Gambia", "GMB"),
    ("The Gambia", "GMB"),
    ("Georgia", "GEO"),
    ("Germany", "DEU"),
    ("Ghana", "GHA"),
    ("Gibraltar", "GIB"),
    ("Greece", "GRC"),
    ("Greenland", "GRL"),
    ("Grenada", "GRD"),
    ("Guadeloupe", "GLP"),
    ("Guam", "GUM"),
    ("Guatemala", "GTM"),
    ("Guernsey", "GGY"),
    ("Guinea", "GIN"),
    ("Guinea-Bissau", "GNB"),
    ("Guyana", "GUY"),
    ("Haiti", "HTI"),
    ("Heard Island and McDonald Islands", "HMD"),
    ("Holy See", "VAT"),
    ("Vatican City", "VAT"),
    ("Honduras", "HND"),
    ("Hong Kong", "HKG"),
    ("Hungary", "HUN"),
    ("Iceland", "ISL"),
    ("India", "IND"),
    ("Indonesia", "IDN"),
    ("Iran", "IRN"),
    ("Iran (Islamic Republic of)", "IRN"),
    ("Iraq", "IRQ"),
    ("Ireland", "IRL"),
    ("Isle of Man", "IMN"),
    ("Israel", "ISR"),
    ("Italy", "ITA"),
    ("Jamaica", "JAM"),
    ("Japan", "JPN"),
    ("Jersey", "JEY"),
    ("Jordan", "JOR"),
    ("Kazakhstan", "KAZ"),
    ("Kenya", "KEN"),
    ("Kiribati", "KIR"),
    ("North Korea", "PRK"),
    ("Democratic People's Republic of Korea", "PRK"),
    ("Korea, Democratic People's Republic of", "PRK"),
    ("South Korea", "KOR"),
    ("Republic of Korea", "KOR"),
    ("Korea, Republic of", "KOR"),
    ("Kosovo", "XKX"),
    ("Kuwait", "KWT"),
    ("Kyrgyzstan", "KGZ"),
    ("Kyrgyz Republic", "KGZ"),
    ("Laos", "LAO"),
    ("Lao People's Democratic Republic", "LAO"),
    ("Lao PDR", "LAO"),
    ("Latvia", "LVA"),
    ("Lebanon", "LBN"),
    ("Lesotho", "LSO"),
    ("Liberia", "LBR"),
    ("Libya", "LBY"),
    ("Liechtenstein", "LIE"),
    ("Lithuania", "LTU"),
    ("Luxembourg", "LUX"),
    ("Macao", "MAC"),
    ("Macau", "MAC"),
    ("Madagascar", "MDG"),
    ("Malawi", "MWI"),
    ("Malaysia", "MYS"),
    ("Maldives", "MDV"),
    ("Mali", "MLI"),
    ("Malta", "MLT"),
    ("Marshall Islands", "MHL"),
    ("Martinique", "MTQ"),
    ("Mauritania", "MRT"),
    ("Mauritius", "MUS"),
    ("Mayotte", "MYT"),
    ("Mexico", "MEX"),
    ("Micronesia", "FSM"),
    ("Micronesia (Federated States of)", "FSM"),
    ("Moldova", "MDA"),
    ("Republic of Moldova", "MDA"),
    ("Monaco", "MCO"),
    ("Mongolia", "MNG"),
    ("Montenegro", "MNE"),
    ("Montserrat", "MSR"),
    ("Morocco", "MAR"),
    ("Mozambique", "MOZ"),
    ("Myanmar", "MMR"),
    ("Burma", "MMR"),
    ("Namibia", "NAM"),
    ("Nauru", "NRU"),
    ("Nepal", "NPL"),
    ("Netherlands", "NLD"),
    ("The Netherlands", "NLD"),
    ("New Caledonia", "NCL"),
    ("New Zealand", "NZL"),
    ("Nicaragua", "NIC"),
    ("Niger", "NER"),
    ("Nigeria", "NGA"),
    ("Niue", "NIU"),
    ("Norfolk Island", "NFK"),
    ("North Macedonia", "MKD"),
    ("Macedonia", "MKD"),
    ("Northern Mariana Islands", "MNP"),
    ("Norway", "NOR"),
    ("Oman", "OMN"),
    ("Pakistan", "PAK"),
    ("Palau", "PLW"),
    ("Palestine", "PSE"),
    ("State of Palestine", "PSE"),
    ("Palestine, State of", "PSE"),
    ("Panama", "PAN"),
    ("Papua New Guinea", "PNG"),
    ("Paraguay", "PRY"),
    ("Peru", "PER"),
    ("Philippines", "PHL"),
    ("Pitcairn", "PCN"),
    ("Poland", "POL"),
    ("Portugal", "PRT"),
    ("Puerto Rico", "PRI"),
    ("Qatar", "QAT"),
    ("Réunion", "REU"),
    ("Romania", "ROU"),
    ("Russia", "RUS"),
    ("Russian Federation", "RUS"),
    ("Rwanda", "RWA"),
    ("Saint Barthélemy", "BLM"),
    ("Saint Helena, Ascension and Tristan da Cunha", "SHN"),
    ("Saint Kitts and Nevis", "KNA"),
    ("Saint Lucia", "LCA"),
    ("Saint Martin (French part)", "MAF"),
    ("Saint Pierre and Miquelon", "SPM"),
    ("Saint Vincent and the Grenadines", "VCT"),
    ("Samoa", "WSM"),
    ("San Marino", "SMR"),
    ("Sao Tome and Principe", "STP"),
    ("Saudi Arabia", "SAU"),
    ("Senegal", "SEN"),
    ("Serbia", "SRB"),
    ("Seychelles", "SYC"),
    ("Sierra Leone", "SLE"),
    ("Singapore", "SGP"),
    ("Sint Maarten (Dutch part)", "SXM"),
    ("Slovakia", "SVK"),
    ("Slovenia", "SVN"),
    ("Solomon Islands", "SLB"),
    ("Somalia", "SOM"),
    ("South Africa", "ZAF"),
    ("South Georgia and the South Sandwich Islands", "SGS"),
    ("South Sudan", "SSD"),
    ("Spain", "ESP"),
    ("Sri Lanka", "LKA"),
    ("Sudan", "SDN"),
    ("Suriname", "SUR"),
    ("Svalbard and Jan Mayen", "SJM"),
    ("Sweden", "SWE"),
    ("Switzerland", "CHE"),
    ("Syria", "SYR"),
    ("Syrian Arab Republic", "SYR"),
    ("Taiwan", "TWN"),
    ("Tajikistan", "TJK"),
    ("Tanzania", "TZA"),
    ("United Republic of Tanzania", "TZA"),
    ("Tanzania, United Republic of", "TZA"),
    ("Thailand", "THA"),
    ("Timor-Leste", "TLS"),
    ("East Timor", "TLS"),
    ("Togo", "TGO"),
    ("Tokelau", "TKL"),
    ("Tonga", "TON"),
    ("Trinidad and Tobago", "TTO"),
    ("Tunisia", "TUN"),
    ("Türkiye", "TUR"),
    ("Turkey", "TUR"),
    ("Turkmenistan", "TKM"),
    ("Turks and Caicos Islands", "TCA"),
    ("Tuvalu", "TUV"),
    ("Uganda", "UGA"),
    ("Ukraine", "UKR"),
    ("United Arab Emirates", "ARE"),
    ("UAE", "ARE"),
    ("United Kingdom", "GBR"),
    ("United Kingdom of Great Britain and Northern Ireland", "GBR"),
    ("UK", "GBR"),
    ("United States", "USA"),
    ("United States of America", "USA"),
    ("USA", "USA"),
    ("United States Minor Outlying Islands", "UMI"),
    ("United States Virgin Islands", "VIR"),
    ("Virgin Islands (U.S.)", "VIR"),
    ("Uruguay", "URY"),
    ("Uzbekistan", "UZB"),
    ("Vanuatu", "VUT"),
    ("Venezuela", "VEN"),
    ("Venezuela (Bolivarian Republic of)", "VEN"),
    ("Vietnam", "VNM"),
    ("Viet Nam", "VNM"),
    ("Wallis and Futuna", "WLF"),
    ("Western Sahara", "ESH"),
    ("Yemen", "YEM"),
    ("Zambia", "ZMB"),
    ("Zimbabwe", "ZWE"),
];
